//! Reference listing of queryable fields

use std::fmt::Write as _;

use crate::{QueryField, RelativeDate};

/// Every field with its type and aliases, followed by the relative date keywords.
pub fn fields_overview() -> String {
    let mut out = String::from("FIELDS\n\n");
    for field in QueryField::all() {
        let aliases = match field.aliases() {
            [] => "-".to_string(),
            aliases => aliases.join(", "),
        };
        let _ = writeln!(out, "  {:<14} {:<20} {}", field, field.field_type(), aliases);
    }

    out.push_str("\nRELATIVE DATES\n\n ");
    for date in RelativeDate::ALL {
        out.push(' ');
        out.push_str(date.name());
    }
    out.push_str("\n\nBare words search id, title, description, design, acceptance and notes.\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_field() {
        let out = fields_overview();
        for field in QueryField::all() {
            assert!(out.contains(field.name()), "missing {}", field);
        }
        assert!(out.contains(&format!("  {:<14} {:<20} -", "design", "nullable string")));
        assert!(out.contains("prio, pri, p"));
        assert!(out.contains("last-week"));
    }
}
