//! The budget programs table shown by the CLI.

use budgetgrid_lib::model::{Money, Record};
use budgetgrid_lib::schema::{ColumnDefinition, ColumnType, TableSchema};
use budgetgrid_lib::totals::AggregationSpec;
use rust_decimal::Decimal;

pub const TABLE: &str = "budget-programs";

pub fn schema() -> budgetgrid_lib::Result<TableSchema> {
    Ok(TableSchema::new(vec![
        ColumnDefinition::new("code", "Code").kind(ColumnType::Custom).base_width(80.0).min_width(72.0).flex(0.0),
        ColumnDefinition::new("name", "Program").base_width(220.0).flex(3.0).min_width(140.0),
        ColumnDefinition::new("department", "Department").base_width(160.0).flex(2.0),
        ColumnDefinition::new("allocated", "Allocated").kind(ColumnType::Currency).base_width(140.0),
        ColumnDefinition::new("spent", "Spent").kind(ColumnType::Currency).base_width(140.0),
        ColumnDefinition::new("utilization", "Used").kind(ColumnType::Percentage).base_width(80.0).max_width(120.0),
        ColumnDefinition::new("starts", "Starts").kind(ColumnType::Date).base_width(110.0).max_width(140.0),
        ColumnDefinition::new("status", "Status").kind(ColumnType::Status).base_width(110.0),
    ])?)
}

pub fn totals() -> Vec<AggregationSpec> {
    vec![
        AggregationSpec::count("name"),
        AggregationSpec::sum("allocated").currency(),
        AggregationSpec::sum("spent").currency(),
        AggregationSpec::custom("utilization", |records| {
            let allocated: f64 = records.iter().filter_map(|r| r.number("allocated")).sum();
            let spent: f64 = records.iter().filter_map(|r| r.number("spent")).sum();
            if allocated == 0.0 { 0.0 } else { spent / allocated * 100.0 }
        })
        .percentage(),
    ]
}

fn program(
    code: &str,
    name: &str,
    department: &str,
    allocated: i64,
    spent: i64,
    starts: &str,
    status: &str,
) -> Record {
    let utilization = if allocated == 0 {
        Decimal::ZERO
    } else {
        (Decimal::from(spent) * Decimal::ONE_HUNDRED / Decimal::from(allocated)).round_dp(1)
    };
    Record::new(code)
        .set("code", code)
        .set("name", name)
        .set("department", department)
        .set("allocated", Money::from_units(allocated))
        .set("spent", Money::from_units(spent))
        .set("utilization", utilization)
        .set("starts", starts)
        .set("status", status)
}

pub fn records() -> Vec<Record> {
    vec![
        program("PRG-001", "Rural road maintenance", "Infrastructure", 4_500_000, 3_120_000, "2024-01-15", "Active"),
        program("PRG-002", "School meals", "Education", 1_250_000, 1_310_500, "2024-02-01", "Overdue"),
        program("PRG-003", "Flood defences", "Environment", 2_800_000, 940_000, "2024-04-10", "In progress"),
        program("PRG-004", "Public library hours", "Culture", 320_000, 0, "2024-09-01", "Draft"),
        program("PRG-005", "Clinic refurbishment", "Health", 1_900_000, 1_900_000, "2023-06-20", "Completed"),
        program("PRG-006", "Youth apprenticeships", "Labour", 760_000, 212_300, "2024-03-18", "Approved"),
        program("PRG-007", "Street lighting retrofit", "Infrastructure", 540_000, 0, "", "Cancelled"),
    ]
}
