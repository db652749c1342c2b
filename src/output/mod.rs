//! Output formatting.
//!
//! This module handles printing plans and apply results:
//! - [`csv`] - CSV output of the subnet plan
//! - [`terminal`] - Field formatting, resource graph and state listings

mod csv;
mod terminal;

pub use csv::{format_csv_row, plan_print, plan_rows, PlanPrintRow, RESERVED};
pub use terminal::{format_field, graph_lines, graph_print, state_print};
