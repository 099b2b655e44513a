//! Storage access: connection setup, identifier quoting and table reads.

mod connection;
mod read;
#[cfg(test)]
pub(crate) mod test_helpers;

pub use connection::open_connection;
pub use read::{read_table, table_columns};
pub(crate) use read::read_cell;

/// Quotes an SQL identifier, doubling embedded double quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("plain"), "\"plain\"");
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(quote_identifier("with space"), "\"with space\"");
    }
}
