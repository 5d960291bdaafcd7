//! Odd-lot tender offer question set and schemas

use crate::parser::{ExtractionSchema, OutputParser};
use crate::pipeline::Question;

/// Purchase price range offered per share
pub fn price_schema() -> ExtractionSchema {
    ExtractionSchema::new("price")
        .field(
            "lower_price",
            "The lowest price in dollars (or other currency) that the company offers to pay \
             per share in this odd-lot tender offer.",
        )
        .field(
            "lower_price_currency",
            "The currency in which the minimum purchase price per share is denominated.",
        )
        .field(
            "higher_price",
            "The highest price in dollars (or other currency) that the company offers to pay \
             per share in this odd-lot tender offer.",
        )
        .field(
            "higher_price_currency",
            "The currency in which the maximum purchase price per share is denominated.",
        )
}

/// General terms of the tender offer
pub fn general_schema() -> ExtractionSchema {
    ExtractionSchema::new("general")
        .field(
            "oddlot_priority",
            "A statement indicating whether odd-lot holders are given priority in the tender \
             offer, formatted as True or False.",
        )
        .field(
            "shareholder_requirements",
            "Requirements a shareholder must meet to qualify as an odd-lot holder \
             (e.g., holding fewer than 100 shares).",
        )
        .field(
            "risks",
            "Any conditions or contingencies mentioned in the tender offer that could result \
             in its cancellation, with an explanation.",
        )
        .field(
            "regulatory_approvals",
            "Any necessary regulatory approvals or clearances that must be obtained before \
             the tender offer can be completed.",
        )
        .field(
            "tax_consequences",
            "Description of any potential tax implications for shareholders participating \
             in the offer.",
        )
}

/// Combined schema covering every odd-lot record field, for joint mode.
pub fn oddlot_schema() -> ExtractionSchema {
    ExtractionSchema::merged("oddlot", &[price_schema(), general_schema()])
}

/// The per-field questions asked in isolated mode.
pub fn oddlot_questions() -> Vec<Question> {
    vec![
        Question {
            key: "expiration_date".to_string(),
            query: "What is the expiration date of the odd-lot offer?".to_string(),
            parser: OutputParser::Datetime,
        },
        Question {
            key: "price".to_string(),
            query: "What purchase price range does the company offer to pay per share in this \
                    odd-lot tender offer?"
                .to_string(),
            parser: OutputParser::Structured(price_schema()),
        },
        Question {
            key: "general".to_string(),
            query: "What are the general terms of this odd-lot tender offer: priority, \
                    shareholder requirements, risks, regulatory approvals, and tax consequences?"
                .to_string(),
            parser: OutputParser::Structured(general_schema()),
        },
    ]
}
