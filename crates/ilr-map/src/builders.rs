//! Templated sub-record builders.
//!
//! Each builder expands `{n}`-parameterized column patterns for one aim
//! and applies its own presence rules. The rules deliberately differ per
//! record kind: FAM entries tolerate missing dates, financial records are
//! all-or-nothing, employment statuses probe monitoring fields one by one.

use serde_json::{Map, Value};

use ilr_model::{AppFinTemplate, EmploymentStatusConfig, FamTemplate, Row};

use crate::aims::substitute_aim;

/// Record keys for learning delivery FAM entries.
const FAM_TYPE: &str = "LearnDelFAMType";
const FAM_CODE: &str = "LearnDelFAMCode";
const FAM_DATE_FROM: &str = "LearnDelFAMDateFrom";
const FAM_DATE_TO: &str = "LearnDelFAMDateTo";

/// Record keys for apprenticeship financial records.
const AFIN_TYPE: &str = "AFinType";
const AFIN_CODE: &str = "AFinCode";
const AFIN_DATE: &str = "AFinDate";
const AFIN_AMOUNT: &str = "AFinAmount";

/// Record keys for employment statuses.
const EMP_STAT: &str = "EmpStat";
const EMP_DATE: &str = "DateEmpStatApp";
const EMP_ID: &str = "EmpId";
const EMP_MONITORING: &str = "EmploymentStatusMonitoring";
const ESM_TYPE: &str = "ESMType";
const ESM_CODE: &str = "ESMCode";

fn resolve<'a>(row: &'a Row, pattern: &str, aim: u8) -> Option<&'a str> {
    row.get_non_blank(&substitute_aim(pattern, aim))
}

/// Builds FAM entries for one aim.
///
/// A blank resolved type means that FAM kind does not apply to this
/// delivery (e.g. a funding indicator that only exists for certain
/// programme types) and the template is skipped. The code defaults to an
/// empty string; each date is included only if present, independently.
#[must_use]
pub fn build_fam_entries(row: &Row, templates: &[FamTemplate], aim: u8) -> Vec<Value> {
    let mut entries = Vec::new();
    for template in templates {
        let Some(fam_type) = resolve(row, &template.type_csv, aim) else {
            continue;
        };
        let code = resolve(row, &template.code_csv, aim).unwrap_or_default();

        let mut entry = Map::new();
        entry.insert(FAM_TYPE.to_string(), Value::String(fam_type.to_string()));
        entry.insert(FAM_CODE.to_string(), Value::String(code.to_string()));
        if let Some(pattern) = &template.date_from_csv {
            if let Some(date_from) = resolve(row, pattern, aim) {
                entry.insert(FAM_DATE_FROM.to_string(), Value::String(date_from.to_string()));
            }
        }
        if let Some(pattern) = &template.date_to_csv {
            if let Some(date_to) = resolve(row, pattern, aim) {
                entry.insert(FAM_DATE_TO.to_string(), Value::String(date_to.to_string()));
            }
        }
        entries.push(Value::Object(entry));
    }
    entries
}

/// Builds apprenticeship financial records for one aim.
///
/// Type, date and amount are each individually required: if any one is
/// blank the whole record for that template slot is skipped. Partial
/// financial records are never emitted.
#[must_use]
pub fn build_app_fin_records(row: &Row, templates: &[AppFinTemplate], aim: u8) -> Vec<Value> {
    let mut records = Vec::new();
    for template in templates {
        let Some(fin_type) = resolve(row, &template.type_csv, aim) else {
            continue;
        };
        let Some(date) = resolve(row, &template.date_csv, aim) else {
            continue;
        };
        let Some(amount) = resolve(row, &template.amount_csv, aim) else {
            continue;
        };

        let mut record = Map::new();
        record.insert(AFIN_TYPE.to_string(), Value::String(fin_type.to_string()));
        if let Some(pattern) = &template.code_csv {
            if let Some(code) = resolve(row, pattern, aim) {
                record.insert(AFIN_CODE.to_string(), Value::String(code.to_string()));
            }
        }
        record.insert(AFIN_DATE.to_string(), Value::String(date.to_string()));
        record.insert(AFIN_AMOUNT.to_string(), Value::String(amount.to_string()));
        records.push(Value::Object(record));
    }
    records
}

/// Builds employment status entries for one aim.
///
/// The status code and its application date are both required for the
/// entry to exist at all. The employer id is included only when present.
/// Monitoring fields are probed independently; the monitoring list is
/// omitted entirely (not emitted empty) when none of them produced a
/// value.
#[must_use]
pub fn build_employment_statuses(
    row: &Row,
    configs: &[EmploymentStatusConfig],
    aim: u8,
) -> Vec<Value> {
    let mut entries = Vec::new();
    for config in configs {
        let Some(status) = resolve(row, &config.status_csv, aim) else {
            continue;
        };
        let Some(date) = resolve(row, &config.date_csv, aim) else {
            continue;
        };

        let mut entry = Map::new();
        entry.insert(EMP_STAT.to_string(), Value::String(status.to_string()));
        entry.insert(EMP_DATE.to_string(), Value::String(date.to_string()));
        if let Some(pattern) = &config.employer_id_csv {
            if let Some(employer_id) = resolve(row, pattern, aim) {
                entry.insert(EMP_ID.to_string(), Value::String(employer_id.to_string()));
            }
        }

        let monitoring: Vec<Value> = config
            .monitoring
            .iter()
            .filter_map(|field| {
                resolve(row, &field.csv, aim).map(|code| {
                    let mut esm = Map::new();
                    esm.insert(ESM_TYPE.to_string(), Value::String(field.esm_type.clone()));
                    esm.insert(ESM_CODE.to_string(), Value::String(code.to_string()));
                    Value::Object(esm)
                })
            })
            .collect();
        if !monitoring.is_empty() {
            entry.insert(EMP_MONITORING.to_string(), Value::Array(monitoring));
        }

        entries.push(Value::Object(entry));
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use ilr_model::EsmField;
    use serde_json::json;

    fn fam_template(date_from: bool, date_to: bool) -> FamTemplate {
        FamTemplate {
            type_csv: "FAM type (aim {n})".to_string(),
            code_csv: "FAM code (aim {n})".to_string(),
            date_from_csv: date_from.then(|| "FAM from (aim {n})".to_string()),
            date_to_csv: date_to.then(|| "FAM to (aim {n})".to_string()),
        }
    }

    #[test]
    fn fam_blank_type_skips_the_template() {
        let mut row = Row::new();
        row.push("FAM type (aim 1)", "  ");
        row.push("FAM code (aim 1)", "105");
        assert!(build_fam_entries(&row, &[fam_template(false, false)], 1).is_empty());
    }

    #[test]
    fn fam_code_defaults_and_dates_are_independent() {
        let mut row = Row::new();
        row.push("FAM type (aim 2)", "ACT");
        row.push("FAM to (aim 2)", "2026-07-31");
        let entries = build_fam_entries(&row, &[fam_template(true, true)], 2);
        assert_eq!(
            entries,
            vec![json!({
                "LearnDelFAMType": "ACT",
                "LearnDelFAMCode": "",
                "LearnDelFAMDateTo": "2026-07-31",
            })]
        );
    }

    #[test]
    fn app_fin_is_all_or_nothing() {
        let template = AppFinTemplate {
            type_csv: "Fin type (aim {n})".to_string(),
            code_csv: Some("Fin code (aim {n})".to_string()),
            date_csv: "Fin date (aim {n})".to_string(),
            amount_csv: "Fin amount (aim {n})".to_string(),
        };

        let mut missing_amount = Row::new();
        missing_amount.push("Fin type (aim 1)", "TNP");
        missing_amount.push("Fin code (aim 1)", "1");
        missing_amount.push("Fin date (aim 1)", "2025-08-01");
        missing_amount.push("Fin amount (aim 1)", "");
        assert!(build_app_fin_records(&missing_amount, std::slice::from_ref(&template), 1).is_empty());

        let mut complete = Row::new();
        complete.push("Fin type (aim 1)", "TNP");
        complete.push("Fin code (aim 1)", "1");
        complete.push("Fin date (aim 1)", "2025-08-01");
        complete.push("Fin amount (aim 1)", "9000");
        let records = build_app_fin_records(&complete, &[template], 1);
        assert_eq!(
            records,
            vec![json!({
                "AFinType": "TNP",
                "AFinCode": "1",
                "AFinDate": "2025-08-01",
                "AFinAmount": "9000",
            })]
        );
    }

    #[test]
    fn employment_status_requires_status_and_date() {
        let config = EmploymentStatusConfig {
            status_csv: "Emp status (aim {n})".to_string(),
            date_csv: "Emp date (aim {n})".to_string(),
            employer_id_csv: Some("Employer id (aim {n})".to_string()),
            monitoring: vec![
                EsmField {
                    esm_type: "SEM".to_string(),
                    csv: "Self employed (aim {n})".to_string(),
                },
                EsmField {
                    esm_type: "LOE".to_string(),
                    csv: "Length employed (aim {n})".to_string(),
                },
            ],
        };

        let mut no_date = Row::new();
        no_date.push("Emp status (aim 1)", "10");
        assert!(build_employment_statuses(&no_date, std::slice::from_ref(&config), 1).is_empty());

        let mut full = Row::new();
        full.push("Emp status (aim 1)", "10");
        full.push("Emp date (aim 1)", "2025-08-01");
        full.push("Length employed (aim 1)", "4");
        let entries = build_employment_statuses(&full, std::slice::from_ref(&config), 1);
        assert_eq!(
            entries,
            vec![json!({
                "EmpStat": "10",
                "DateEmpStatApp": "2025-08-01",
                "EmploymentStatusMonitoring": [
                    {"ESMType": "LOE", "ESMCode": "4"}
                ],
            })]
        );
    }

    #[test]
    fn empty_monitoring_list_is_omitted_entirely() {
        let config = EmploymentStatusConfig {
            status_csv: "Emp status (aim {n})".to_string(),
            date_csv: "Emp date (aim {n})".to_string(),
            employer_id_csv: None,
            monitoring: vec![EsmField {
                esm_type: "SEM".to_string(),
                csv: "Self employed (aim {n})".to_string(),
            }],
        };
        let mut row = Row::new();
        row.push("Emp status (aim 3)", "12");
        row.push("Emp date (aim 3)", "2025-09-01");
        let entries = build_employment_statuses(&row, &[config], 3);
        let entry = entries[0].as_object().expect("object entry");
        assert!(!entry.contains_key("EmploymentStatusMonitoring"));
    }
}
