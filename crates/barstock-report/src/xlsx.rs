//! Writing a [`Table`] to a single-sheet workbook.

use std::path::Path;

use barstock_core::{Table, Value};
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook};

use crate::{Error, Result};

/// Save `table` to `path`. Column A holds the row index and has no header,
/// the way a data frame exports.
pub fn write_xlsx(table: &Table, path: &Path) -> Result<()> {
  let mut workbook = Workbook::new();
  let sheet = workbook.add_worksheet();
  let bold = Format::new().set_bold();

  for (c, name) in table.columns.iter().enumerate() {
    sheet.write_string_with_format(0, col(c + 1)?, name.as_str(), &bold)?;
  }

  for (i, row) in table.rows.iter().enumerate() {
    let r = RowNum::try_from(i + 1).map_err(|_| Error::TooLarge(i + 1))?;
    sheet.write_number_with_format(r, 0, i as f64, &bold)?;
    for (c, value) in row.iter().enumerate() {
      let c = col(c + 1)?;
      match value {
        Value::Null => {}
        Value::Integer(n) => {
          sheet.write_number(r, c, *n as f64)?;
        }
        Value::Real(x) => {
          sheet.write_number(r, c, *x)?;
        }
        Value::Text(s) => {
          sheet.write_string(r, c, s.as_str())?;
        }
      }
    }
  }

  workbook.save(path)?;
  Ok(())
}

fn col(c: usize) -> Result<ColNum> {
  ColNum::try_from(c).map_err(|_| Error::TooLarge(c))
}
