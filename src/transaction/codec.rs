//! Converts transactions to and from the lines of the comma separated data file.
//!
//! The data file has no quoting or escaping. Delimiters and line breaks inside a
//! text field are replaced with spaces before writing, so they do not survive a
//! round trip through the file.

use csv::{QuoteStyle, StringRecord, Terminator, WriterBuilder};

use crate::{Error, transaction::Transaction};

/// The field separator of the data file.
pub const DELIMITER: u8 = b',';

/// The names of the columns of the data file, in the order they are stored.
pub const HEADER: [&str; 6] = ["id", "date", "category", "payee", "amount", "notes"];

const ID_COLUMN: usize = 0;
const DATE_COLUMN: usize = 1;
const CATEGORY_COLUMN: usize = 2;
const PAYEE_COLUMN: usize = 3;
const AMOUNT_COLUMN: usize = 4;
const NOTES_COLUMN: usize = 5;

/// An amount that could not be read as a finite number.
#[derive(Debug, thiserror::Error, PartialEq)]
#[error("{0:?} is not a number")]
pub struct AmountError(pub String);

/// The reasons a row of the data file cannot be turned into a [Transaction].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DecodeError {
    /// The row ended before the amount column.
    #[error("the row has no amount column")]
    MissingAmount,

    /// The amount column is not a number.
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),
}

/// Make `text` safe to store as a single field of the data file.
///
/// Every delimiter and line break is replaced with a space and surrounding
/// whitespace is trimmed.
pub fn sanitize_field(text: &str) -> String {
    text.replace([DELIMITER as char, '\r', '\n'], " ")
        .trim()
        .to_owned()
}

/// Parse the amount column, or an amount sent by a client as text.
///
/// Blank text is read as zero. Anything else must be a finite decimal number.
///
/// ```
/// use ledgerline::transaction::codec::parse_amount;
///
/// assert_eq!(parse_amount(" -10.5 "), Ok(-10.5));
/// assert_eq!(parse_amount(""), Ok(0.0));
/// assert!(parse_amount("abc").is_err());
/// ```
pub fn parse_amount(text: &str) -> Result<f64, AmountError> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return Ok(0.0);
    }

    match trimmed.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(AmountError(text.to_owned())),
    }
}

/// Render an amount as a plain decimal string.
///
/// Amounts that are not finite are written as zero.
pub fn format_amount(amount: f64) -> String {
    // Also folds negative zero into "0".
    if !amount.is_finite() || amount == 0.0 {
        return "0".to_owned();
    }

    amount.to_string()
}

/// The six fields of `transaction` in file order, ready to be written.
pub fn encode_fields(transaction: &Transaction) -> [String; 6] {
    [
        sanitize_field(&transaction.id),
        sanitize_field(&transaction.date),
        sanitize_field(&transaction.category),
        sanitize_field(&transaction.payee),
        format_amount(transaction.amount),
        sanitize_field(&transaction.notes),
    ]
}

/// Encode `transaction` as a newline terminated line of the data file.
///
/// # Errors
/// Returns [Error::Storage] if the CSV writer fails, which should not happen
/// when writing to memory.
pub fn encode(transaction: &Transaction) -> Result<String, Error> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .delimiter(DELIMITER)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(encode_fields(transaction))?;

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::Storage(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::Storage(error.to_string()))
}

/// Decode a row of the data file.
///
/// Columns past the sixth are ignored and missing text columns are read as
/// empty strings. Nothing is un-escaped.
///
/// # Errors
/// Returns a [DecodeError] if the amount column is missing or not a number.
pub fn decode_record(record: &StringRecord) -> Result<Transaction, DecodeError> {
    let text_field = |column: usize| record.get(column).unwrap_or_default().to_owned();

    let amount = record
        .get(AMOUNT_COLUMN)
        .ok_or(DecodeError::MissingAmount)?;
    let amount = parse_amount(amount)?;

    Ok(Transaction {
        id: text_field(ID_COLUMN),
        date: text_field(DATE_COLUMN),
        category: text_field(CATEGORY_COLUMN),
        payee: text_field(PAYEE_COLUMN),
        amount,
        notes: text_field(NOTES_COLUMN),
    })
}

/// Decode a single line of the data file, with or without its line terminator.
///
/// See [decode_record] for details.
pub fn decode_line(line: &str) -> Result<Transaction, DecodeError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let record: StringRecord = line.split(DELIMITER as char).collect();

    decode_record(&record)
}
