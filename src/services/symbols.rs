//! 股票代码列表
//!
//! 从 CSV 文件的 Symbol 列读取可选股票代码，保持文件中的顺序

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{StockError, StockResult};

const SYMBOL_COLUMN: &str = "Symbol";

/// 读取股票代码文件
pub fn load_symbols<P: AsRef<Path>>(path: P) -> StockResult<Vec<String>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read_symbols(file).map_err(|e| match e {
        StockError::MissingSymbolColumn(_) => {
            StockError::MissingSymbolColumn(path.display().to_string())
        }
        other => other,
    })
}

/// 从任意 CSV 数据源读取 Symbol 列，空值跳过
pub fn read_symbols<R: Read>(reader: R) -> StockResult<Vec<String>> {
    let mut csv = csv::Reader::from_reader(reader);

    let column = csv
        .headers()?
        .iter()
        .position(|h| h.trim() == SYMBOL_COLUMN)
        .ok_or_else(|| StockError::MissingSymbolColumn("CSV 数据".to_string()))?;

    let mut symbols = Vec::new();
    for record in csv.records() {
        let record = record?;
        if let Some(symbol) = record.get(column).map(str::trim).filter(|s| !s.is_empty()) {
            symbols.push(symbol.to_string());
        }
    }

    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_symbol_column_in_order() {
        let data = "Name,Symbol,Sector\nApple,AAPL,Tech\nIBM Corp,IBM,Tech\nAlphabet, GOOGL ,Tech\n";
        let symbols = read_symbols(data.as_bytes()).unwrap();
        assert_eq!(symbols, vec!["AAPL", "IBM", "GOOGL"]);
    }

    #[test]
    fn test_skips_blank_values() {
        let data = "Symbol\nAAPL\n\"\"\nMSFT\n";
        assert_eq!(read_symbols(data.as_bytes()).unwrap(), vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let data = "Ticker,Name\nAAPL,Apple\n";
        assert!(matches!(
            read_symbols(data.as_bytes()),
            Err(StockError::MissingSymbolColumn(_))
        ));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(matches!(
            load_symbols("/nonexistent/stocks.csv"),
            Err(StockError::Io(_))
        ));
    }

    #[test]
    fn test_bundled_symbol_file() {
        let symbols = load_symbols(concat!(env!("CARGO_MANIFEST_DIR"), "/stocks.csv")).unwrap();
        assert!(!symbols.is_empty());
        assert_eq!(symbols[0], "AAPL");
        assert!(symbols.contains(&"IBM".to_string()));
    }
}
