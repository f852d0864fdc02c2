//! Usage table rendering.
//!
//! Renders the registry as an aligned table, one row per declared
//! parameter in schema declaration order. Rendering is pure; the only
//! side effect lives in [`Registry::print_usage`].

use std::fmt::Write as _;

use crate::registry::Registry;

const HEADERS: [&str; 4] = ["Parameter", "Data type", "Default value", "Description"];
const GUTTER: usize = 3;

impl Registry {
    /// Renders the usage table to a string.
    ///
    /// Columns are padded to their widest cell; rows follow schema
    /// declaration order regardless of map iteration details.
    #[must_use]
    pub fn render_usage(&self) -> String {
        let rows: Vec<[String; 4]> = self
            .iter()
            .map(|spec| {
                let name = spec.cmd().map_or_else(
                    || spec.display_name().to_string(),
                    |cmd| format!("-{cmd}"),
                );
                [
                    name,
                    format!("<{}>", spec.kind().tag()),
                    spec.baseline().to_string(),
                    spec.usage().to_string(),
                ]
            })
            .collect();

        let mut widths: [usize; 4] = HEADERS.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.len());
            }
        }

        let total: usize = widths.iter().sum::<usize>() + GUTTER * (widths.len() - 1);
        let mut out = String::new();
        render_row(&mut out, &widths, &HEADERS.map(String::from));
        let _ = writeln!(out, "{}", "-".repeat(total));
        for row in &rows {
            render_row(&mut out, &widths, row);
        }
        out
    }

    /// Writes the usage table to standard output.
    pub fn print_usage(&self) {
        print!("{}", self.render_usage());
    }
}

fn render_row(out: &mut String, widths: &[usize; 4], cells: &[String; 4]) {
    for (i, (cell, &width)) in cells.iter().zip(widths.iter()).enumerate() {
        if i > 0 {
            out.push_str(&" ".repeat(GUTTER));
        }
        if i == cells.len() - 1 {
            // Last column is ragged.
            out.push_str(cell);
        } else {
            let _ = write!(out, "{cell:<width$}");
        }
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use crate::registry::Registry;
    use crate::schema::Schema;

    #[derive(Default)]
    struct Target {
        host: String,
        port: i64,
        secret: String,
    }

    fn registry() -> Registry {
        let schema = Schema::<Target>::new()
            .string(
                "host",
                "cmd=host,env=APP_HOST,default=127.0.0.1,usage=hostname or IP",
                |c, v| c.host = v,
            )
            .int("port", "cmd=port,default=8080,usage=listen port", |c, v| c.port = v)
            .string("secret", "env=APP_SECRET,usage=shared secret", |c, v| c.secret = v);
        Registry::from_schema_with_env(&schema, |_| None).unwrap()
    }

    #[test]
    fn test_header_and_rule() {
        let table = registry().render_usage();
        let mut lines = table.lines();
        let header = lines.next().unwrap();
        for column in ["Parameter", "Data type", "Default value", "Description"] {
            assert!(header.contains(column), "missing column {column}");
        }
        assert!(lines.next().unwrap().starts_with("---"));
    }

    #[test]
    fn test_rows_follow_declaration_order() {
        let table = registry().render_usage();
        let rows: Vec<&str> = table.lines().skip(2).collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with("-host"));
        assert!(rows[1].starts_with("-port"));
        // Env-only parameters are listed under their variable name.
        assert!(rows[2].starts_with("APP_SECRET"));
    }

    #[test]
    fn test_row_content() {
        let table = registry().render_usage();
        let row = table.lines().nth(2).unwrap();
        assert!(row.contains("<string>"));
        assert!(row.contains("127.0.0.1"));
        assert!(row.contains("hostname or IP"));
    }

    #[test]
    fn test_rendering_is_stable() {
        let registry = registry();
        assert_eq!(registry.render_usage(), registry.render_usage());
    }
}
