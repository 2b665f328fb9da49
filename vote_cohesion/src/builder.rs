pub use crate::config::*;
use crate::Rollcall;

/// A builder for assembling a roll-call table row by row.
///
/// This is the entry point for readers that produce one record at a time,
/// such as the CSV reader of the command line interface.
///
/// ```
/// pub use vote_cohesion::builder::Builder;
/// pub use vote_cohesion::VoteCoding;
/// # use vote_cohesion::CohesionErrors;
///
/// let mut builder = Builder::new(&VoteCoding::numeric())
///     .columns(&["poll1".to_string(), "poll2".to_string()])?;
///
/// builder.add_row(&["1".to_string(), "".to_string()])?;
/// builder.add_row(&["0".to_string(), "1".to_string()])?;
/// let rollcall = builder.build()?;
/// assert_eq!(rollcall.num_rows(), 2);
///
/// # Ok::<(), CohesionErrors>(())
/// ```
pub struct Builder {
    pub(crate) _coding: VoteCoding,
    pub(crate) _columns: Option<Vec<String>>,
    pub(crate) _rows: Vec<Vec<String>>,
}

impl Builder {
    pub fn new(coding: &VoteCoding) -> Builder {
        Builder {
            _coding: coding.clone(),
            _columns: None,
            _rows: Vec::new(),
        }
    }

    /// Sets the header of the table. Metadata columns are recognized at
    /// build time, not here.
    pub fn columns(self, columns: &[String]) -> Result<Builder, CohesionErrors> {
        if columns.is_empty() {
            return Err(CohesionErrors::EmptyHeader);
        }
        Ok(Builder {
            _coding: self._coding,
            _columns: Some(columns.to_vec()),
            _rows: Vec::new(),
        })
    }

    /// Adds one row of raw cells, in header order.
    pub fn add_row(&mut self, cells: &[String]) -> Result<(), CohesionErrors> {
        match &self._columns {
            Some(columns) if cells.len() != columns.len() => Err(CohesionErrors::MismatchedRow),
            _ => {
                self._rows.push(cells.to_vec());
                Ok(())
            }
        }
    }

    pub fn build(self) -> Result<Rollcall, CohesionErrors> {
        let columns = self._columns.ok_or(CohesionErrors::EmptyHeader)?;
        Rollcall::from_table(&columns, &self._rows, &self._coding)
    }
}
