use super::SqlGenerator;

/// PostgreSQL fragment generator.
///
/// Identifiers are always quoted, so derived snake_case names survive even
/// when they collide with reserved words.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresGenerator;

impl SqlGenerator for PostgresGenerator {
    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    fn parameter(&self, name: &str) -> String {
        format!("@{}", name)
    }

    fn limit_offset(&self, skip: Option<u64>, take: Option<u64>) -> String {
        match (take, skip) {
            (Some(take), Some(skip)) => format!("LIMIT {} OFFSET {}", take, skip),
            (Some(take), None) => format!("LIMIT {}", take),
            (None, Some(skip)) => format!("OFFSET {}", skip),
            (None, None) => String::new(),
        }
    }

    fn returning(&self, column: &str) -> String {
        format!(" RETURNING {}", self.quote_identifier(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoting_doubles_embedded_quotes() {
        let g = PostgresGenerator;
        assert_eq!(g.quote_identifier("user"), "\"user\"");
        assert_eq!(g.quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn paging_clauses() {
        let g = PostgresGenerator;
        assert_eq!(g.limit_offset(Some(20), Some(10)), "LIMIT 10 OFFSET 20");
        assert_eq!(g.limit_offset(None, Some(10)), "LIMIT 10");
        assert_eq!(g.limit_offset(Some(20), None), "OFFSET 20");
        assert_eq!(g.limit_offset(None, None), "");
    }
}
