use std::iter::FusedIterator;

use crate::error::Result;

use super::iterator::RowIterator;
use super::row::Row;

/// Anything that produces rows one at a time.
pub trait RowSource {
    /// Returns the next row or `Ok(None)` at end of sequence.
    ///
    /// # Errors
    ///
    /// Propagates failures from the underlying reader.
    fn next_row(&mut self) -> Result<Option<Row>>;
}

impl RowSource for RowIterator {
    fn next_row(&mut self) -> Result<Option<Row>> {
        self.try_next()
    }
}

/// Skips a leading number of rows and caps how many are returned.
///
/// Skipped rows are still decoded; the underlying sequence cannot seek.
pub struct RowWindow<S = RowIterator> {
    inner: S,
    skip_remaining: u64,
    remaining: Option<u64>,
}

impl<S> RowWindow<S> {
    pub const fn new(inner: S, skip: u64, max_rows: Option<u64>) -> Self {
        Self {
            inner,
            skip_remaining: skip,
            remaining: max_rows,
        }
    }

    #[must_use]
    pub const fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: RowSource> RowWindow<S> {
    /// Advances the window by one row.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding a skipped or returned row fails.
    #[cfg_attr(feature = "hotpath", hotpath::measure)]
    pub fn try_next(&mut self) -> Result<Option<Row>> {
        if matches!(self.remaining, Some(0)) {
            return Ok(None);
        }
        if !consume_skip(&mut self.skip_remaining, &mut self.inner)? {
            self.remaining = Some(0);
            return Ok(None);
        }
        let Some(row) = self.inner.next_row()? else {
            self.remaining = Some(0);
            return Ok(None);
        };
        if let Some(rem) = self.remaining.as_mut() {
            *rem = rem.saturating_sub(1);
        }
        Ok(Some(row))
    }
}

/// Returns `false` if the source ran out while skipping.
fn consume_skip<S: RowSource>(skip_remaining: &mut u64, source: &mut S) -> Result<bool> {
    while *skip_remaining > 0 {
        if source.next_row()?.is_none() {
            *skip_remaining = 0;
            return Ok(false);
        }
        *skip_remaining -= 1;
    }
    Ok(true)
}

impl<S: RowSource> Iterator for RowWindow<S> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.try_next() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => None,
            Err(err) => {
                self.remaining = Some(0);
                Some(Err(err))
            }
        }
    }
}

impl<S: RowSource> FusedIterator for RowWindow<S> {}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::sync::Arc;

    use super::*;
    use crate::error::{Error, Section};

    struct Numbers {
        next: u64,
        end: u64,
        fail_at: Option<u64>,
        calls: u64,
    }

    impl Numbers {
        const fn new(end: u64) -> Self {
            Self {
                next: 0,
                end,
                fail_at: None,
                calls: 0,
            }
        }
    }

    impl RowSource for Numbers {
        fn next_row(&mut self) -> Result<Option<Row>> {
            self.calls += 1;
            if self.fail_at == Some(self.next) {
                return Err(Error::Corrupted {
                    section: Section::RowGroup { index: 0 },
                    details: Cow::from("boom"),
                });
            }
            if self.next >= self.end {
                return Ok(None);
            }
            let mut row = Row::new();
            row.push(Arc::from("n"), self.next.to_string());
            self.next += 1;
            Ok(Some(row))
        }
    }

    fn collect(window: RowWindow<Numbers>) -> Vec<String> {
        window
            .map(|row| row.expect("row").get("n").expect("n").to_owned())
            .collect()
    }

    #[test]
    fn skips_then_limits() {
        let window = RowWindow::new(Numbers::new(10), 3, Some(2));
        assert_eq!(collect(window), ["3", "4"]);
    }

    #[test]
    fn unlimited_window_drains_the_source() {
        let window = RowWindow::new(Numbers::new(4), 1, None);
        assert_eq!(collect(window), ["1", "2", "3"]);
    }

    #[test]
    fn skipping_past_the_end_yields_nothing() {
        let mut window = RowWindow::new(Numbers::new(2), 5, None);
        assert!(window.try_next().expect("advance").is_none());
        assert!(window.try_next().expect("advance").is_none());
        assert_eq!(window.get_ref().calls, 3);
    }

    #[test]
    fn zero_limit_never_touches_the_source() {
        let mut window = RowWindow::new(Numbers::new(2), 0, Some(0));
        assert!(window.try_next().expect("advance").is_none());
        assert_eq!(window.into_inner().calls, 0);
    }

    #[test]
    fn errors_end_the_iterator() {
        let mut source = Numbers::new(10);
        source.fail_at = Some(1);
        let mut window = RowWindow::new(source, 0, None);
        assert!(window.next().expect("first").is_ok());
        assert!(window.next().expect("second").is_err());
        assert!(window.next().is_none());
    }
}
