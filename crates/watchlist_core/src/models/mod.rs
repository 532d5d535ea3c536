/// Evaluator wire entries and per-expression outcomes.
pub mod entry;
/// Watch table rows.
pub mod row;

#[cfg(test)]
mod tests;
