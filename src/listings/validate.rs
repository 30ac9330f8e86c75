use crate::error::ValidationError;

use super::{ListingDraft, NewListing, PriceInput};

pub const MIN_TITLE_CHARS: usize = 5;
pub const MIN_DESCRIPTION_CHARS: usize = 20;
pub const MIN_LOCATION_CHARS: usize = 3;

/// Every rule the draft breaks, in field order. Empty means valid.
pub fn validate_listing_draft(draft: &ListingDraft) -> Vec<ValidationError> {
    use ValidationError::*;

    let mut errors = Vec::new();

    errors.extend(check_text(
        draft.title.as_deref(),
        MIN_TITLE_CHARS,
        TitleRequired,
        TitleTooShort,
    ));
    errors.extend(check_text(
        draft.description.as_deref(),
        MIN_DESCRIPTION_CHARS,
        DescriptionRequired,
        DescriptionTooShort,
    ));
    if draft.price.as_ref().and_then(PriceInput::positive).is_none() {
        errors.push(InvalidPrice);
    }
    errors.extend(check_text(
        draft.location.as_deref(),
        MIN_LOCATION_CHARS,
        LocationRequired,
        LocationTooShort,
    ));

    errors
}

fn check_text(
    value: Option<&str>,
    min_chars: usize,
    required: ValidationError,
    too_short: ValidationError,
) -> Option<ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Some(required),
        Some(text) if text.chars().count() < min_chars => Some(too_short),
        Some(_) => None,
    }
}

impl ListingDraft {
    /// Validates, then trims text and fixes the price as a number.
    /// New listings are available unless the draft says otherwise.
    pub fn into_new_listing(self) -> Result<NewListing, Vec<ValidationError>> {
        let errors = validate_listing_draft(&self);
        if !errors.is_empty() {
            return Err(errors);
        }

        let trimmed = |text: Option<String>| text.unwrap_or_default().trim().to_owned();
        Ok(NewListing {
            price: self.price.as_ref().and_then(PriceInput::positive).unwrap_or_default(),
            title: trimmed(self.title),
            description: trimmed(self.description),
            location: trimmed(self.location),
            availability: self.availability.unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ValidationError::*;

    fn draft(title: &str, description: &str, price: PriceInput, location: &str) -> ListingDraft {
        ListingDraft {
            title: Some(title.to_owned()),
            description: Some(description.to_owned()),
            price: Some(price),
            location: Some(location.to_owned()),
            availability: None,
        }
    }

    #[test]
    fn reports_every_problem_at_once() {
        let errors = validate_listing_draft(&draft("Hi", "short", PriceInput::Number(-5.0), "NY"));
        assert_eq!(
            errors,
            vec![TitleTooShort, DescriptionTooShort, InvalidPrice, LocationTooShort]
        );
    }

    #[test]
    fn missing_fields_are_required() {
        let errors = validate_listing_draft(&ListingDraft::default());
        assert_eq!(
            errors,
            vec![TitleRequired, DescriptionRequired, InvalidPrice, LocationRequired]
        );
    }

    #[test]
    fn blank_fields_are_required_not_short() {
        let blank = draft("   ", "\t", PriceInput::Text(" ".to_owned()), " ");
        assert_eq!(
            validate_listing_draft(&blank),
            vec![TitleRequired, DescriptionRequired, InvalidPrice, LocationRequired]
        );
    }

    #[test]
    fn minimum_lengths_are_inclusive() {
        let ok = draft("Lofty", "Twenty characters!!!", PriceInput::Text("1".to_owned()), "Oslo");
        assert!(validate_listing_draft(&ok).is_empty());

        let ok = draft("Lofty", "Twenty characters!!!", PriceInput::Number(0.01), "Rio");
        assert!(validate_listing_draft(&ok).is_empty());
    }

    #[test]
    fn padding_does_not_count_towards_length() {
        let errors = validate_listing_draft(&draft(
            "  Hut  ",
            "A small hut by a lake, quiet.",
            PriceInput::Number(40.0),
            "  NY  ",
        ));
        assert_eq!(errors, vec![TitleTooShort, LocationTooShort]);
    }

    #[test]
    fn valid_draft_is_trimmed_and_coerced() {
        let listing = draft(
            "  Cozy apartment in city center ",
            " Two bedrooms, close to the metro and parks. ",
            PriceInput::Text("75.00".to_owned()),
            " Paris, France ",
        )
        .into_new_listing()
        .unwrap();

        assert_eq!(
            listing,
            NewListing {
                title: "Cozy apartment in city center".to_owned(),
                description: "Two bedrooms, close to the metro and parks.".to_owned(),
                price: 75.0,
                location: "Paris, France".to_owned(),
                availability: true,
            }
        );
    }

    #[test]
    fn invalid_draft_does_not_convert() {
        let result = draft("Hi", "short", PriceInput::Number(-5.0), "NY").into_new_listing();
        assert_eq!(result.unwrap_err().len(), 4);
    }
}
