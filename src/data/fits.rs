//! Minimal FITS container support: enough to read and write the binary table
//! extensions that carry OVIRS map products.
//!
//! A FITS file is a sequence of HDUs (header/data units). Each header is a
//! run of 80-byte ASCII cards terminated by `END`, padded to a 2880-byte
//! block; the data that follows is big-endian and likewise block-padded.
//! Binary tables (`XTENSION = 'BINTABLE'`) store fixed-width rows whose
//! layout is described by `TFORMn` / `TTYPEn` cards.

use std::io::Write;
use std::path::Path;

use thiserror::Error;

pub const BLOCK_LEN: usize = 2880;
pub const CARD_LEN: usize = 80;

#[derive(Debug, Error)]
pub enum FitsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("truncated FITS data: needed {needed} bytes at offset {offset}")]
    Truncated { offset: usize, needed: usize },

    #[error("header starting at offset {0} has no END card")]
    MissingEnd(usize),

    #[error("missing required keyword {0}")]
    MissingKeyword(String),

    #[error("keyword {keyword} has invalid value {value:?}")]
    InvalidValue { keyword: String, value: String },

    #[error("HDU {0} is not a binary table")]
    NotBinaryTable(usize),

    #[error("unsupported column format {0:?}")]
    UnsupportedFormat(String),

    #[error("column {0} not found")]
    MissingColumn(String),

    #[error("columns differ in length ({expected} vs {found})")]
    ColumnLengthMismatch { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, FitsError>;

// ---------------------------------------------------------------------------
// Header cards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    Logical(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub keyword: String,
    pub value: Option<HeaderValue>,
}

#[derive(Debug, Clone, Default)]
pub struct Header {
    cards: Vec<Card>,
}

impl Header {
    pub fn get(&self, keyword: &str) -> Option<&HeaderValue> {
        self.cards
            .iter()
            .find(|c| c.keyword == keyword)
            .and_then(|c| c.value.as_ref())
    }

    pub fn integer(&self, keyword: &str) -> Result<i64> {
        match self.get(keyword) {
            Some(HeaderValue::Integer(i)) => Ok(*i),
            Some(other) => Err(FitsError::InvalidValue {
                keyword: keyword.to_string(),
                value: format!("{other:?}"),
            }),
            None => Err(FitsError::MissingKeyword(keyword.to_string())),
        }
    }

    pub fn integer_or(&self, keyword: &str, default: i64) -> Result<i64> {
        match self.get(keyword) {
            None => Ok(default),
            Some(_) => self.integer(keyword),
        }
    }

    /// Non-negative integer used as a size or count.
    pub fn count(&self, keyword: &str) -> Result<usize> {
        let value = self.integer(keyword)?;
        usize::try_from(value).map_err(|_| invalid(keyword, value))
    }

    pub fn count_or(&self, keyword: &str, default: usize) -> Result<usize> {
        match self.get(keyword) {
            None => Ok(default),
            Some(_) => self.count(keyword),
        }
    }

    /// Numeric value, accepting integers written without a decimal point.
    pub fn float_or(&self, keyword: &str, default: f64) -> Result<f64> {
        match self.get(keyword) {
            None => Ok(default),
            Some(HeaderValue::Float(f)) => Ok(*f),
            Some(HeaderValue::Integer(i)) => Ok(*i as f64),
            Some(other) => Err(FitsError::InvalidValue {
                keyword: keyword.to_string(),
                value: format!("{other:?}"),
            }),
        }
    }

    pub fn text(&self, keyword: &str) -> Option<&str> {
        match self.get(keyword) {
            Some(HeaderValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

fn invalid(keyword: &str, value: impl ToString) -> FitsError {
    FitsError::InvalidValue {
        keyword: keyword.to_string(),
        value: value.to_string(),
    }
}

fn parse_card(raw: &[u8]) -> Card {
    let text = String::from_utf8_lossy(raw);
    let keyword = text.get(..8).unwrap_or(&*text).trim_end().to_string();
    let value = if text.get(8..10) == Some("= ") {
        text.get(10..).and_then(parse_value)
    } else {
        None
    };
    Card { keyword, value }
}

fn parse_value(field: &str) -> Option<HeaderValue> {
    let field = field.trim_start();
    if let Some(rest) = field.strip_prefix('\'') {
        // Quoted string; '' is an escaped quote.
        let mut out = String::new();
        let mut chars = rest.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    out.push('\'');
                } else {
                    break;
                }
            } else {
                out.push(c);
            }
        }
        return Some(HeaderValue::Text(out.trim_end().to_string()));
    }

    let token = field.split('/').next().unwrap_or("").trim();
    if token.is_empty() {
        return None;
    }
    match token {
        "T" => return Some(HeaderValue::Logical(true)),
        "F" => return Some(HeaderValue::Logical(false)),
        _ => {}
    }
    if let Ok(i) = token.parse::<i64>() {
        return Some(HeaderValue::Integer(i));
    }
    if let Ok(f) = token.replace(['D', 'd'], "E").parse::<f64>() {
        return Some(HeaderValue::Float(f));
    }
    Some(HeaderValue::Text(token.to_string()))
}

// ---------------------------------------------------------------------------
// HDU layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Hdu {
    header: Header,
    data_offset: usize,
    data_len: usize,
}

fn padded(len: usize) -> usize {
    len.div_ceil(BLOCK_LEN) * BLOCK_LEN
}

/// Size of the data unit in bytes: `|BITPIX| / 8 * GCOUNT * (PCOUNT + NAXIS1 * ... * NAXISn)`.
fn data_len(header: &Header) -> Result<usize> {
    let bitpix = header.integer("BITPIX")?;
    if !matches!(bitpix, 8 | 16 | 32 | 64 | -32 | -64) {
        return Err(invalid("BITPIX", bitpix));
    }
    let naxis = header.count("NAXIS")?;
    if naxis > 999 {
        return Err(invalid("NAXIS", naxis));
    }
    if naxis == 0 {
        return Ok(0);
    }
    let mut elements: usize = 1;
    for n in 1..=naxis {
        let keyword = format!("NAXIS{n}");
        let axis = header.count(&keyword)?;
        elements = elements
            .checked_mul(axis)
            .ok_or_else(|| invalid(&keyword, axis))?;
    }
    let pcount = header.count_or("PCOUNT", 0)?;
    let gcount = header.count_or("GCOUNT", 1)?;
    let word = bitpix.unsigned_abs() as usize / 8;
    elements
        .checked_add(pcount)
        .and_then(|n| n.checked_mul(gcount))
        .and_then(|n| n.checked_mul(word))
        .ok_or_else(|| invalid("NAXIS", elements))
}

/// Parse one header at `offset`; returns it and the offset of its data.
fn parse_header(bytes: &[u8], offset: usize) -> Result<(Header, usize)> {
    let mut cards = Vec::new();
    let mut pos = offset;
    loop {
        if pos + BLOCK_LEN > bytes.len() {
            return Err(FitsError::MissingEnd(offset));
        }
        for raw in bytes[pos..pos + BLOCK_LEN].chunks(CARD_LEN) {
            let card = parse_card(raw);
            if card.keyword == "END" {
                return Ok((Header { cards }, pos + BLOCK_LEN));
            }
            cards.push(card);
        }
        pos += BLOCK_LEN;
    }
}

fn parse_hdus(bytes: &[u8]) -> Result<Vec<Hdu>> {
    let mut hdus = Vec::new();
    let mut offset = 0;
    while offset + BLOCK_LEN <= bytes.len() {
        let (header, data_offset) = parse_header(bytes, offset)?;
        let len = data_len(&header)?;
        if len > bytes.len() - data_offset {
            return Err(FitsError::Truncated {
                offset: data_offset,
                needed: len,
            });
        }
        hdus.push(Hdu {
            header,
            data_offset,
            data_len: len,
        });
        offset = data_offset + padded(len);
    }
    Ok(hdus)
}

// ---------------------------------------------------------------------------
// FitsFile
// ---------------------------------------------------------------------------

/// A fully read FITS file. The file handle is closed once the bytes are in
/// memory.
#[derive(Debug, Clone)]
pub struct FitsFile {
    bytes: Vec<u8>,
    hdus: Vec<Hdu>,
}

impl FitsFile {
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let hdus = parse_hdus(&bytes)?;
        Ok(Self { bytes, hdus })
    }

    pub fn hdu_count(&self) -> usize {
        self.hdus.len()
    }

    /// Binary table at HDU `index`, or `None` if the file has no such HDU.
    pub fn binary_table(&self, index: usize) -> Result<Option<BinTable<'_>>> {
        let Some(hdu) = self.hdus.get(index) else {
            return Ok(None);
        };
        if hdu.header.text("XTENSION").map(str::trim) != Some("BINTABLE") {
            return Err(FitsError::NotBinaryTable(index));
        }
        BinTable::new(&self.bytes[hdu.data_offset..hdu.data_offset + hdu.data_len], &hdu.header)
            .map(Some)
    }
}

// ---------------------------------------------------------------------------
// Binary tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum FieldType {
    U8,
    I16,
    I32,
    I64,
    F32,
    F64,
    /// Anything we can skip over but not read as a number.
    Other,
}

#[derive(Debug, Clone)]
pub struct ColumnDesc {
    pub name: String,
    pub format: String,
    field_type: FieldType,
    repeat: usize,
    offset: usize,
    scale: f64,
    zero: f64,
}

/// Parse a TFORM value into (repeat, type, byte width).
fn parse_tform(tform: &str) -> Result<(usize, FieldType, usize)> {
    let unsupported = || FitsError::UnsupportedFormat(tform.trim().to_string());
    let tform = tform.trim();
    let digits: String = tform.chars().take_while(|c| c.is_ascii_digit()).collect();
    let repeat = if digits.is_empty() {
        1
    } else {
        digits.parse::<usize>().map_err(|_| unsupported())?
    };
    let code = tform[digits.len()..].chars().next().ok_or_else(unsupported)?;
    let (field_type, width) = match code {
        'B' => (FieldType::U8, Some(repeat)),
        'I' => (FieldType::I16, repeat.checked_mul(2)),
        'J' => (FieldType::I32, repeat.checked_mul(4)),
        'K' => (FieldType::I64, repeat.checked_mul(8)),
        'E' => (FieldType::F32, repeat.checked_mul(4)),
        'D' => (FieldType::F64, repeat.checked_mul(8)),
        'L' | 'A' => (FieldType::Other, Some(repeat)),
        'X' => (FieldType::Other, Some(repeat.div_ceil(8))),
        'C' | 'P' => (FieldType::Other, repeat.checked_mul(8)),
        'M' | 'Q' => (FieldType::Other, repeat.checked_mul(16)),
        _ => return Err(unsupported()),
    };
    Ok((repeat, field_type, width.ok_or_else(unsupported)?))
}

/// Borrowed view over one binary-table HDU.
#[derive(Debug)]
pub struct BinTable<'a> {
    data: &'a [u8],
    row_len: usize,
    rows: usize,
    columns: Vec<ColumnDesc>,
}

impl<'a> BinTable<'a> {
    fn new(data: &'a [u8], header: &Header) -> Result<Self> {
        let row_len = header.count("NAXIS1")?;
        let rows = header.count("NAXIS2")?;
        let tfields = header.count("TFIELDS")?;
        if row_len.checked_mul(rows).map_or(true, |n| n > data.len()) {
            return Err(FitsError::Truncated {
                offset: 0,
                needed: row_len.saturating_mul(rows),
            });
        }

        let mut columns = Vec::new();
        let mut offset = 0;
        for n in 1..=tfields {
            let format = header
                .text(&format!("TFORM{n}"))
                .ok_or_else(|| FitsError::MissingKeyword(format!("TFORM{n}")))?
                .to_string();
            let (repeat, field_type, width) = parse_tform(&format)?;
            columns.push(ColumnDesc {
                name: header.text(&format!("TTYPE{n}")).unwrap_or("").trim().to_string(),
                format,
                field_type,
                repeat,
                offset,
                scale: header.float_or(&format!("TSCAL{n}"), 1.0)?,
                zero: header.float_or(&format!("TZERO{n}"), 0.0)?,
            });
            offset = offset
                .checked_add(width)
                .filter(|&end| end <= row_len)
                .ok_or_else(|| invalid("NAXIS1", row_len))?;
        }

        Ok(Self {
            data,
            row_len,
            rows,
            columns,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Look up a column by name, ignoring ASCII case.
    pub fn column(&self, name: &str) -> Option<&ColumnDesc> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Read a scalar numeric column as physical values (`TZERO + TSCAL * raw`).
    pub fn read_f64(&self, name: &str) -> Result<Vec<f64>> {
        let col = self
            .column(name)
            .ok_or_else(|| FitsError::MissingColumn(name.to_string()))?;
        if col.repeat != 1 || col.field_type == FieldType::Other {
            return Err(FitsError::UnsupportedFormat(col.format.clone()));
        }

        (0..self.rows)
            .map(|row| {
                let start = row * self.row_len + col.offset;
                let bytes = self.data.get(start..).unwrap_or_default();
                let raw = decode(bytes, col.field_type).ok_or(FitsError::Truncated {
                    offset: start,
                    needed: self.row_len,
                })?;
                Ok(col.zero + col.scale * raw)
            })
            .collect()
    }
}

fn decode(bytes: &[u8], field_type: FieldType) -> Option<f64> {
    fn take<const N: usize>(bytes: &[u8]) -> Option<[u8; N]> {
        bytes.get(..N)?.try_into().ok()
    }
    Some(match field_type {
        FieldType::U8 => *bytes.first()? as f64,
        FieldType::I16 => i16::from_be_bytes(take(bytes)?) as f64,
        FieldType::I32 => i32::from_be_bytes(take(bytes)?) as f64,
        FieldType::I64 => i64::from_be_bytes(take(bytes)?) as f64,
        FieldType::F32 => f32::from_be_bytes(take(bytes)?) as f64,
        FieldType::F64 => f64::from_be_bytes(take(bytes)?),
        FieldType::Other => return None,
    })
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Column payload for [`write_bintable`].
#[derive(Debug, Clone)]
pub enum ColumnData {
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl ColumnData {
    fn len(&self) -> usize {
        match self {
            ColumnData::F32(v) => v.len(),
            ColumnData::F64(v) => v.len(),
        }
    }

    fn tform(&self) -> &'static str {
        match self {
            ColumnData::F32(_) => "1E",
            ColumnData::F64(_) => "1D",
        }
    }

    fn width(&self) -> usize {
        match self {
            ColumnData::F32(_) => 4,
            ColumnData::F64(_) => 8,
        }
    }

    fn write_row(&self, row: usize, out: &mut Vec<u8>) {
        match self {
            ColumnData::F32(v) => out.extend_from_slice(&v[row].to_be_bytes()),
            ColumnData::F64(v) => out.extend_from_slice(&v[row].to_be_bytes()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableColumn {
    pub name: String,
    pub data: ColumnData,
}

enum CardValue<'a> {
    Logical(bool),
    Integer(i64),
    Text(&'a str),
}

fn push_card(header: &mut Vec<u8>, keyword: &str, value: CardValue<'_>) {
    let card = match value {
        CardValue::Logical(b) => format!("{keyword:<8}= {:>20}", if b { "T" } else { "F" }),
        CardValue::Integer(i) => format!("{keyword:<8}= {i:>20}"),
        CardValue::Text(s) => format!("{keyword:<8}= '{:<8}'", s.replace('\'', "''")),
    };
    push_raw_card(header, &card);
}

fn push_raw_card(header: &mut Vec<u8>, text: &str) {
    let mut card = text.as_bytes().to_vec();
    card.resize(CARD_LEN, b' ');
    header.extend_from_slice(&card[..CARD_LEN]);
}

fn finish_header(mut header: Vec<u8>) -> Vec<u8> {
    push_raw_card(&mut header, "END");
    header.resize(padded(header.len()), b' ');
    header
}

/// Write an empty primary HDU announcing extensions.
pub fn write_primary_header<W: Write>(w: &mut W) -> Result<()> {
    let mut header = Vec::new();
    push_card(&mut header, "SIMPLE", CardValue::Logical(true));
    push_card(&mut header, "BITPIX", CardValue::Integer(8));
    push_card(&mut header, "NAXIS", CardValue::Integer(0));
    push_card(&mut header, "EXTEND", CardValue::Logical(true));
    w.write_all(&finish_header(header))?;
    Ok(())
}

/// Append a binary-table extension holding the given scalar columns.
pub fn write_bintable<W: Write>(w: &mut W, extname: &str, columns: &[TableColumn]) -> Result<()> {
    let rows = columns.first().map_or(0, |c| c.data.len());
    for c in columns {
        if c.data.len() != rows {
            return Err(FitsError::ColumnLengthMismatch {
                expected: rows,
                found: c.data.len(),
            });
        }
    }
    let row_len: usize = columns.iter().map(|c| c.data.width()).sum();

    let mut header = Vec::new();
    push_card(&mut header, "XTENSION", CardValue::Text("BINTABLE"));
    push_card(&mut header, "BITPIX", CardValue::Integer(8));
    push_card(&mut header, "NAXIS", CardValue::Integer(2));
    push_card(&mut header, "NAXIS1", CardValue::Integer(row_len as i64));
    push_card(&mut header, "NAXIS2", CardValue::Integer(rows as i64));
    push_card(&mut header, "PCOUNT", CardValue::Integer(0));
    push_card(&mut header, "GCOUNT", CardValue::Integer(1));
    push_card(&mut header, "TFIELDS", CardValue::Integer(columns.len() as i64));
    for (i, c) in columns.iter().enumerate() {
        let n = i + 1;
        push_card(&mut header, &format!("TTYPE{n}"), CardValue::Text(&c.name));
        push_card(&mut header, &format!("TFORM{n}"), CardValue::Text(c.data.tform()));
    }
    push_card(&mut header, "EXTNAME", CardValue::Text(extname));
    w.write_all(&finish_header(header))?;

    let mut data = Vec::with_capacity(padded(row_len * rows));
    for row in 0..rows {
        for c in columns {
            c.data.write_row(row, &mut data);
        }
    }
    data.resize(padded(data.len()), 0);
    w.write_all(&data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_file(columns: &[TableColumn]) -> Vec<u8> {
        let mut buf = Vec::new();
        write_primary_header(&mut buf).unwrap();
        write_bintable(&mut buf, "MAP", columns).unwrap();
        buf
    }

    fn columns() -> Vec<TableColumn> {
        vec![
            TableColumn {
                name: "LATITUDE".to_string(),
                data: ColumnData::F64(vec![1.0, 2.0, 3.0]),
            },
            TableColumn {
                name: "VALUE".to_string(),
                data: ColumnData::F32(vec![-9999.0, 0.25, 0.5]),
            },
        ]
    }

    #[test]
    fn test_blocks_are_aligned() {
        let buf = sample_file(&columns());
        assert_eq!(buf.len() % BLOCK_LEN, 0);
        assert_eq!(buf.len(), 3 * BLOCK_LEN);
    }

    #[test]
    fn test_read_back_columns() {
        let fits = FitsFile::from_bytes(sample_file(&columns())).unwrap();
        assert_eq!(fits.hdu_count(), 2);
        let table = fits.binary_table(1).unwrap().unwrap();
        assert_eq!(table.rows(), 3);
        assert_eq!(table.read_f64("latitude").unwrap(), vec![1.0, 2.0, 3.0]);
        assert_eq!(table.read_f64("VALUE").unwrap(), vec![-9999.0, 0.25, 0.5]);
    }

    #[test]
    fn test_missing_extension_is_none() {
        let mut buf = Vec::new();
        write_primary_header(&mut buf).unwrap();
        let fits = FitsFile::from_bytes(buf).unwrap();
        assert_eq!(fits.hdu_count(), 1);
        assert!(fits.binary_table(1).unwrap().is_none());
    }

    #[test]
    fn test_primary_is_not_a_table() {
        let fits = FitsFile::from_bytes(sample_file(&columns())).unwrap();
        assert!(matches!(fits.binary_table(0), Err(FitsError::NotBinaryTable(0))));
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let fits = FitsFile::from_bytes(sample_file(&columns())).unwrap();
        let table = fits.binary_table(1).unwrap().unwrap();
        assert!(matches!(table.read_f64("LONGITUDE"), Err(FitsError::MissingColumn(_))));
    }

    #[test]
    fn test_ragged_columns_rejected() {
        let mut cols = columns();
        cols[1].data = ColumnData::F32(vec![1.0]);
        let mut buf = Vec::new();
        assert!(matches!(
            write_bintable(&mut buf, "MAP", &cols),
            Err(FitsError::ColumnLengthMismatch { expected: 3, found: 1 })
        ));
    }

    #[test]
    fn test_truncated_file() {
        let mut buf = sample_file(&columns());
        buf.truncate(buf.len() - BLOCK_LEN);
        assert!(FitsFile::from_bytes(buf).is_err());
    }

    #[test]
    fn test_parse_value_variants() {
        assert_eq!(parse_value("                   T / flag"), Some(HeaderValue::Logical(true)));
        assert_eq!(parse_value("  42"), Some(HeaderValue::Integer(42)));
        assert_eq!(parse_value(" 1.5D2"), Some(HeaderValue::Float(150.0)));
        assert_eq!(
            parse_value("'O''Brien '  / name"),
            Some(HeaderValue::Text("O'Brien".to_string()))
        );
    }

    #[test]
    fn test_tform_widths() {
        assert_eq!(parse_tform("1E").unwrap(), (1, FieldType::F32, 4));
        assert_eq!(parse_tform("D").unwrap(), (1, FieldType::F64, 8));
        assert_eq!(parse_tform("16A").unwrap(), (16, FieldType::Other, 16));
        assert_eq!(parse_tform("3X").unwrap(), (3, FieldType::Other, 1));
        assert!(parse_tform("Z").is_err());
    }

    /// Primary HDU plus a one-column BINTABLE header with the given axis
    /// sizes and a single empty data block.
    fn table_with_axes(bitpix: i64, naxis1: i64, naxis2: i64) -> Vec<u8> {
        let mut header = Vec::new();
        push_card(&mut header, "XTENSION", CardValue::Text("BINTABLE"));
        push_card(&mut header, "BITPIX", CardValue::Integer(bitpix));
        push_card(&mut header, "NAXIS", CardValue::Integer(2));
        push_card(&mut header, "NAXIS1", CardValue::Integer(naxis1));
        push_card(&mut header, "NAXIS2", CardValue::Integer(naxis2));
        push_card(&mut header, "PCOUNT", CardValue::Integer(0));
        push_card(&mut header, "GCOUNT", CardValue::Integer(1));
        push_card(&mut header, "TFIELDS", CardValue::Integer(1));
        push_card(&mut header, "TTYPE1", CardValue::Text("VALUE"));
        push_card(&mut header, "TFORM1", CardValue::Text("E"));

        let mut buf = Vec::new();
        write_primary_header(&mut buf).unwrap();
        buf.extend_from_slice(&finish_header(header));
        buf.resize(buf.len() + BLOCK_LEN, 0);
        buf
    }

    #[test]
    fn test_oversized_axis_is_an_error() {
        let buf = table_with_axes(8, 1 << 62, 4);
        assert!(matches!(
            FitsFile::from_bytes(buf),
            Err(FitsError::InvalidValue { ref keyword, .. }) if keyword == "NAXIS2"
        ));
    }

    #[test]
    fn test_negative_axes_are_an_error() {
        let buf = table_with_axes(8, -4, -2);
        assert!(matches!(
            FitsFile::from_bytes(buf),
            Err(FitsError::InvalidValue { ref keyword, .. }) if keyword == "NAXIS1"
        ));
    }

    #[test]
    fn test_bitpix_must_be_a_known_width() {
        for bitpix in [0, 12, -16] {
            let buf = table_with_axes(bitpix, 4, 2);
            assert!(matches!(
                FitsFile::from_bytes(buf),
                Err(FitsError::InvalidValue { ref keyword, .. }) if keyword == "BITPIX"
            ));
        }
    }

    #[test]
    fn test_axes_larger_than_file_are_truncated() {
        let buf = table_with_axes(8, 4, 1_000_000);
        assert!(matches!(FitsFile::from_bytes(buf), Err(FitsError::Truncated { .. })));
    }

    #[test]
    fn test_huge_tform_repeat_is_rejected() {
        assert!(parse_tform(&format!("{}D", usize::MAX / 2)).is_err());
    }

    #[test]
    fn test_scaled_integer_column() {
        // Hand-built header: one 'I' column with TSCAL/TZERO.
        let mut header = Vec::new();
        push_card(&mut header, "XTENSION", CardValue::Text("BINTABLE"));
        push_card(&mut header, "BITPIX", CardValue::Integer(8));
        push_card(&mut header, "NAXIS", CardValue::Integer(2));
        push_card(&mut header, "NAXIS1", CardValue::Integer(2));
        push_card(&mut header, "NAXIS2", CardValue::Integer(2));
        push_card(&mut header, "PCOUNT", CardValue::Integer(0));
        push_card(&mut header, "GCOUNT", CardValue::Integer(1));
        push_card(&mut header, "TFIELDS", CardValue::Integer(1));
        push_card(&mut header, "TTYPE1", CardValue::Text("VALUE"));
        push_card(&mut header, "TFORM1", CardValue::Text("I"));
        push_raw_card(&mut header, "TSCAL1  =                  0.5");
        push_raw_card(&mut header, "TZERO1  =                   10");

        let mut buf = Vec::new();
        write_primary_header(&mut buf).unwrap();
        buf.extend_from_slice(&finish_header(header));
        let mut data = Vec::new();
        data.extend_from_slice(&4i16.to_be_bytes());
        data.extend_from_slice(&(-2i16).to_be_bytes());
        data.resize(BLOCK_LEN, 0);
        buf.extend_from_slice(&data);

        let fits = FitsFile::from_bytes(buf).unwrap();
        let table = fits.binary_table(1).unwrap().unwrap();
        assert_eq!(table.read_f64("value").unwrap(), vec![12.0, 9.0]);
    }
}
