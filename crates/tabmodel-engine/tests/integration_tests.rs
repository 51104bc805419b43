//! End-to-end evaluation of models against data inputs

use pretty_assertions::assert_eq;
use tabmodel_core::{Bindings, Config, Report, TableDefinition};
use tabmodel_data::{InputDataModel, JsonInput, XmlInput};
use tabmodel_engine::{ConditionEngine, ModelValidation, TableSnapshot, ValueResolver};

const MODEL: &str = r#"{
    "name": "Payroll",
    "filter": "Active",
    "fields": [
        {"type": "Field", "name": "DEPT", "value": {"style": "{DeptStyle}"}},
        {"type": "Fixed", "pieces": "Code", "piece": "Office"},
        {"type": "Packet", "name": "HIRED", "input_format": "LongDateFormat"},
        {"type": "Field", "name": "SALARY", "width": "1200",
         "aggregate": {"type": "Max", "show": "Yes", "location": "Top"}}
    ],
    "resources": {
        "styles": [
            {"name": "Plain"},
            {"name": "Even", "inherits": "Plain"},
            {"name": "Odd", "inherits": "Plain"},
            {"name": "Top"}
        ],
        "filters": [
            {"key": "Active", "field": "STATUS", "criterial": "NotEqualTo", "value": "left"}
        ],
        "fixed": [
            {"name": "Code", "reference": "CODE",
             "pieces": [{"name": "Office", "from": 2, "length": 3}]}
        ],
        "conditions": [
            {"key": "stripes", "field": "DEPT", "type": "WhenChange",
             "first_swap_style": "Even", "second_swap_style": "Odd"},
            {"key": "best", "field": "SALARY", "type": "Maximum", "style": "Top"}
        ]
    }
}"#;

const DATA: &str = r#"[
    {"DEPT": "Sales", "CODE": "ESMAD01", "HIRED": "20190401", "SALARY": 3100, "STATUS": "active"},
    {"DEPT": "Sales", "CODE": "ESBCN02", "HIRED": "20200115", "SALARY": 2800, "STATUS": "active"},
    {"DEPT": "Ops", "CODE": "FRPAR01", "HIRED": "20180901", "SALARY": 9000, "STATUS": "left"},
    {"DEPT": "Ops", "CODE": "ESMAD03", "HIRED": "20210610", "SALARY": 3500, "STATUS": "active"},
    {"DEPT": "Sales", "CODE": "ESVLC01", "HIRED": "20220301", "SALARY": 2500, "STATUS": "active"}
]"#;

fn bound_model() -> TableDefinition {
    let mut table = TableDefinition::from_json(MODEL).unwrap();
    let bindings: Bindings = [("DeptStyle".to_string(), "Plain".to_string())].into_iter().collect();
    table.apply_bindings(&bindings);
    table
}

#[test]
fn snapshot_of_filtered_payroll() {
    let table = bound_model();
    let input = JsonInput::from_json(DATA);
    let config = Config::default();
    let mut ctx = InputDataModel::new(&table, &input).create_context().unwrap();
    let resolver = ValueResolver::for_context(&ctx, &config);
    let mut engine = ConditionEngine::new();

    let snapshot = TableSnapshot::build(&mut ctx, &mut engine, &resolver).unwrap();

    let headers: Vec<_> = snapshot.headers.iter().map(|c| c.value.as_str()).collect();
    assert_eq!(headers, vec!["DEPT", "Office", "HIRED", "SALARY"]);

    let dept_styles: Vec<_> = snapshot.rows.iter().map(|r| r[0].style.as_str()).collect();
    assert_eq!(dept_styles, vec!["Even", "Even", "Odd", "Even"]);

    let offices: Vec<_> = snapshot.rows.iter().map(|r| r[1].value.as_str()).collect();
    assert_eq!(offices, vec!["MAD", "BCN", "MAD", "VLC"]);
    assert_eq!(snapshot.rows[0][2].value, "2019/04/01");

    let salary_styles: Vec<_> = snapshot.rows.iter().map(|r| r[3].style.as_str()).collect();
    assert_eq!(salary_styles, vec!["Default", "Default", "Top", "Default"]);

    let top = snapshot.top_aggregates.unwrap();
    assert_eq!(top[3].value, "3500");
    assert_eq!(top[0].value, "");
    assert_eq!(snapshot.bottom_aggregates, None);
}

#[test]
fn same_snapshot_from_xml() {
    let table = bound_model();
    let input = XmlInput::from_xml(
        r#"<payroll>
            <row DEPT="Ops" CODE="ESMAD03" HIRED="20210610" SALARY="3500" STATUS="active"/>
            <row DEPT="Ops" CODE="FRPAR01" HIRED="20180901" SALARY="9000" STATUS="LEFT"/>
        </payroll>"#,
    );
    let config = Config::default();
    let mut ctx = InputDataModel::new(&table, &input).create_context().unwrap();
    let resolver = ValueResolver::for_context(&ctx, &config);

    let snapshot = TableSnapshot::build(&mut ctx, &mut ConditionEngine::new(), &resolver).unwrap();
    assert_eq!(snapshot.rows.len(), 1);
    assert_eq!(snapshot.rows[0][3].style, "Top");
}

#[test]
fn unbound_model_fails_validation_into_report() {
    let table = TableDefinition::from_json(MODEL).unwrap();
    let validation = ModelValidation::validate(&table, &Config::default(), Some("payroll.json".into()));

    assert!(validation.has_errors());
    assert_eq!(validation.error_count(), 1);
    assert_eq!(validation.diagnostics[0].message, "Style binding '{DeptStyle}' is not bound");

    let mut report = Report::from_diagnostics(validation.diagnostics);
    report.record_model(table.fields.len());
    assert!(report.has_errors());
    assert_eq!(report.summary.fields_checked, 4);

    let bound = ModelValidation::validate(&bound_model(), &Config::default(), None);
    assert!(bound.diagnostics.is_empty(), "{:?}", bound.diagnostics);
}
