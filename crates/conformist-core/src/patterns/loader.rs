//! DTO → Domain model conversion with validation.

use crate::types::{Evidence, VerticalDirection, ViolationKind};

use super::config_dto::{PatternDto, PatternTableDto};
use super::model::{ExceptionPattern, PatternName, PatternTable, Predicate};
use super::PatternError;

/// Converts a `PatternTableDto` to a validated `PatternTable`.
///
/// # Errors
///
/// Returns the first error encountered during conversion.
pub fn load(dto: PatternTableDto) -> Result<PatternTable, PatternError> {
    let patterns = dto
        .patterns
        .into_iter()
        .map(convert_pattern)
        .collect::<Result<Vec<_>, _>>()?;

    PatternTable::new(dto.version, patterns)
}

fn convert_pattern(dto: PatternDto) -> Result<ExceptionPattern, PatternError> {
    let name = PatternName::new(&dto.name)?;
    let predicate = convert_predicate(&dto)?;

    let applies_to = dto
        .applies_to
        .iter()
        .map(|value| parse_kinds(value, &dto.name))
        .collect::<Result<Vec<_>, _>>()?
        .concat();

    let mut pattern = ExceptionPattern::new(name, predicate)
        .with_applies_to(applies_to)
        .with_active(dto.active);
    if let Some(rationale) = dto.rationale {
        pattern = pattern.with_rationale(rationale);
    }
    Ok(pattern)
}

fn convert_predicate(dto: &PatternDto) -> Result<Predicate, PatternError> {
    // Empty arguments are rejected by `PatternTable::new`.
    let argument = |value: &Option<String>,
                    argument: &'static str|
     -> Result<String, PatternError> {
        value.clone().ok_or_else(|| PatternError::MissingArgument {
            pattern: dto.name.clone(),
            predicate: dto.predicate.clone(),
            argument,
        })
    };

    match dto.predicate.as_str() {
        "shared-stem" => Ok(Predicate::SharedStem {
            marker: argument(&dto.marker, "marker")?,
        }),
        "contains-token" => Ok(Predicate::ContainsToken {
            token: argument(&dto.token, "token")?,
        }),
        "evidence" => {
            let value = argument(&dto.evidence, "evidence")?;
            parse_evidence(&value, &dto.name).map(Predicate::Evidence)
        }
        "under-prefix" => Ok(Predicate::UnderPrefix {
            prefix: argument(&dto.prefix, "prefix")?,
        }),
        other => Err(PatternError::UnknownPredicate {
            pattern: dto.name.clone(),
            predicate: other.to_string(),
        }),
    }
}

/// Parses a kind selector; `vertical-dependency` selects both directions.
fn parse_kinds(value: &str, pattern: &str) -> Result<Vec<ViolationKind>, PatternError> {
    if value == "vertical-dependency" {
        return Ok(vec![
            ViolationKind::VerticalDependency(VerticalDirection::DescendantOnAncestor),
            ViolationKind::VerticalDependency(VerticalDirection::AncestorOnDescendant),
        ]);
    }
    value
        .parse::<ViolationKind>()
        .map(|kind| vec![kind])
        .map_err(|_| PatternError::UnknownKind {
            pattern: pattern.to_string(),
            value: value.to_string(),
        })
}

fn parse_evidence(value: &str, pattern: &str) -> Result<Evidence, PatternError> {
    match value {
        "invocation" => Ok(Evidence::Invocation),
        "data-reference" => Ok(Evidence::DataReference),
        _ => Err(PatternError::UnknownEvidence {
            pattern: pattern.to_string(),
            value: value.to_string(),
        }),
    }
}
