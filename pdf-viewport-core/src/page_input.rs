//! Jump-to-page text box

use crate::error::PageInputError;

/// Backing state of the page number text box.
///
/// Edits are free-form; nothing reaches the viewport until the text is
/// submitted and validates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInput {
    raw_text: String,
    last_valid_page: u32,
    error: Option<PageInputError>,
}

impl Default for PageInput {
    fn default() -> Self {
        Self {
            raw_text: "1".to_string(),
            last_valid_page: 1,
            error: None,
        }
    }
}

impl PageInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.raw_text
    }

    pub fn last_valid_page(&self) -> u32 {
        self.last_valid_page
    }

    /// Validation error from the last submit, cleared on the next edit
    pub fn error(&self) -> Option<&PageInputError> {
        self.error.as_ref()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Replace the text with whatever the user typed
    pub fn edit(&mut self, text: impl Into<String>) {
        self.raw_text = text.into();
        self.error = None;
    }

    /// Check the current text against `[1, total_pages]`, or just `>= 1`
    /// while the page count is unknown
    pub fn validate(&self, total_pages: Option<u32>) -> Result<u32, PageInputError> {
        parse_page(&self.raw_text, total_pages)
    }

    /// Validate and record the outcome. A valid value is returned so the
    /// caller can navigate; an invalid one leaves the box in its error
    /// state with the text untouched.
    pub fn submit(&mut self, total_pages: Option<u32>) -> Result<u32, PageInputError> {
        match self.validate(total_pages) {
            Ok(page) => {
                self.error = None;
                Ok(page)
            }
            Err(err) => {
                tracing::debug!(text = %self.raw_text, %err, "rejected page input");
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Overwrite the text with the canonical form of `page`
    pub fn sync(&mut self, page: u32) {
        self.raw_text = page.to_string();
        self.last_valid_page = page;
        self.error = None;
    }
}

fn parse_page(text: &str, total_pages: Option<u32>) -> Result<u32, PageInputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PageInputError::Empty);
    }
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PageInputError::NotANumber(trimmed.to_string()));
    }
    let page = trimmed
        .parse::<u32>()
        .map_err(|_| PageInputError::TooLarge(trimmed.to_string()))?;
    if page == 0 {
        return Err(PageInputError::Zero);
    }
    match total_pages {
        Some(total_pages) if page > total_pages => {
            Err(PageInputError::OutOfRange { page, total_pages })
        }
        _ => Ok(page),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_page_one() {
        let input = PageInput::new();
        assert_eq!(input.text(), "1");
        assert!(!input.has_error());
    }

    #[test]
    fn accepts_in_range_with_whitespace() {
        let mut input = PageInput::new();
        input.edit(" 7 ");
        assert_eq!(input.submit(Some(10)), Ok(7));
    }

    #[test]
    fn rejects_out_of_range() {
        let mut input = PageInput::new();
        input.edit("11");
        assert_eq!(
            input.submit(Some(10)),
            Err(PageInputError::OutOfRange { page: 11, total_pages: 10 })
        );
        assert!(input.has_error());
        assert_eq!(input.text(), "11");
    }

    #[test]
    fn rejects_non_numeric_forms() {
        for text in ["", "abc", "3.0", "1e1", "-2", "+3"] {
            let mut input = PageInput::new();
            input.edit(text);
            assert!(input.submit(Some(10)).is_err(), "{text:?} should be rejected");
        }
    }

    #[test]
    fn zero_is_rejected_even_without_page_count() {
        let mut input = PageInput::new();
        input.edit("0");
        assert_eq!(input.submit(None), Err(PageInputError::Zero));
    }

    #[test]
    fn unknown_page_count_only_requires_positive() {
        let mut input = PageInput::new();
        input.edit("999");
        assert_eq!(input.submit(None), Ok(999));
    }

    #[test]
    fn overflowing_number_is_rejected_with_or_without_page_count() {
        for total_pages in [Some(5), None] {
            let mut input = PageInput::new();
            input.edit("99999999999999");
            assert_eq!(
                input.submit(total_pages),
                Err(PageInputError::TooLarge("99999999999999".to_string()))
            );
            assert!(input.has_error());
        }
    }

    #[test]
    fn editing_clears_error() {
        let mut input = PageInput::new();
        input.edit("x");
        let _ = input.submit(Some(3));
        assert!(input.has_error());

        input.edit("2");
        assert!(!input.has_error());
    }

    #[test]
    fn sync_normalizes_text() {
        let mut input = PageInput::new();
        input.edit("007");
        input.sync(7);
        assert_eq!(input.text(), "7");
        assert_eq!(input.last_valid_page(), 7);
    }
}
