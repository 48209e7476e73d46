use crate::{
    ResultFormatter, ResultTable,
    payload::ApproveResponse,
};
use model::core::cell::Cell;
use serde_json::json;

const REPR_RESULT: &str = "[(1, 'Widget', Decimal('19.99'), 3, datetime.datetime(2024, 1, 15, 10, 30)), \
                            (2, 'Gadget', Decimal('5.5'), 12, None)]";

#[test]
fn repr_payload_renders_like_json_payload() {
    let response = ApproveResponse::from_body(json!({
        "result": REPR_RESULT,
        "answer": "Two products.",
        "query": "SELECT p.id, p.name, p.price, p.stock AS qty, p.created_at FROM products p"
    }));

    let formatter = ResultFormatter::default();
    let sql = response.query.clone().unwrap_or_default();
    let table = ResultTable::from_query(&formatter, &sql, &response.rows());

    assert_eq!(table.labels, vec!["id", "name", "price", "qty", "created_at"]);
    assert_eq!(
        table.rows,
        vec![
            vec![
                Cell::Number(1.0),
                Cell::text("Widget"),
                Cell::text("$19.99"),
                Cell::Number(3.0),
                Cell::text("1/15/2024, 10:30:00 AM"),
            ],
            vec![
                Cell::Number(2.0),
                Cell::text("Gadget"),
                Cell::text("$5.50"),
                Cell::Number(12.0),
                Cell::Null,
            ],
        ]
    );
}

#[test]
fn result_data_wins_over_repr() {
    let response = ApproveResponse::from_body(json!({
        "result": REPR_RESULT,
        "result_data": "[[\"datetime.datetime(2024, 1, 15, 22, 0, 0)\", \"Decimal('3')\"]]",
    }));

    let rows = ResultFormatter::default().sanitize_json(&response.rows());
    assert_eq!(
        rows,
        vec![vec![Cell::text("1/15/2024, 10:00:00 PM"), Cell::text("$3.00")]]
    );
}

#[test]
fn column_types_override_heuristics() {
    let response = ApproveResponse::from_body(json!({
        "result_data": "[[\"50\", \"50\"]]",
        "column_types": ["integer", "numeric(10,2)"],
    }));

    let formatter = ResultFormatter::default();
    let rows = formatter.sanitize_with_kinds(&response.rows(), &response.column_kinds());
    assert_eq!(rows, vec![vec![Cell::text("50"), Cell::text("50")]]);
}
