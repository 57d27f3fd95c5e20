use std::str::FromStr;

use thiserror::Error;

use super::LayoutError;
use super::expr::{Expr, ExprError, Frame};

/// Why a template was rejected.
#[derive(Debug, Error, PartialEq, Clone)]
pub enum FormatIssue {
    #[error("expected 4 fields, found {0}")]
    FieldCount(usize),
    #[error("field {index}: {source}")]
    Field {
        index: usize,
        #[source]
        source: ExprError,
    },
}

/// Local, screen relative rectangle produced by a template before any
/// margin or gap is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// A parsed `"<expr>,<expr>,<expr>,<expr>"` layout template.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutTemplate {
    source: String,
    /// Always exactly four: x, y, width, height.
    fields: Vec<Expr>,
}

impl LayoutTemplate {
    pub fn parse(source: &str) -> Result<Self, LayoutError> {
        let invalid = |reason: FormatIssue| LayoutError::InvalidFormat {
            template: source.to_string(),
            reason,
        };

        let parts: Vec<&str> = source.split(',').collect();
        if parts.len() != 4 {
            return Err(invalid(FormatIssue::FieldCount(parts.len())));
        }

        let fields = parts
            .iter()
            .enumerate()
            .map(|(index, part)| {
                Expr::parse(part).map_err(|source| invalid(FormatIssue::Field { index, source }))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { source: source.to_string(), fields })
    }

    pub fn source(&self) -> &str { &self.source }

    /// Evaluates all four fields, truncating each toward zero. Values
    /// outside the `i32` range are rejected.
    pub fn evaluate(&self, frame: &Frame) -> Result<RawRect, LayoutError> {
        let mut values = [0i32; 4];
        for (index, (expr, slot)) in self.fields.iter().zip(values.iter_mut()).enumerate() {
            let value = expr.eval(frame).and_then(to_pixel).map_err(|source| {
                LayoutError::InvalidFormat {
                    template: self.source.clone(),
                    reason: FormatIssue::Field { index, source },
                }
            })?;
            *slot = value;
        }
        let [x, y, width, height] = values;
        Ok(RawRect { x, y, width, height })
    }
}

fn to_pixel(value: f64) -> Result<i32, ExprError> {
    let value = value.trunc();
    if value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return Err(ExprError::OutOfRange(value));
    }
    Ok(value as i32)
}

impl FromStr for LayoutTemplate {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

/// Checks that `template` parses and evaluates against [`Frame::CANONICAL`].
pub fn validate_layout(template: &str) -> Result<LayoutTemplate, LayoutError> {
    let parsed = LayoutTemplate::parse(template)?;
    parsed.evaluate(&Frame::CANONICAL)?;
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_default_templates() {
        for template in [
            "0,0,{width},{height}",
            "{width}/2,0,{width}/2,{height}",
            "{width}*2/3,{height}/2,{width}/3,{height}/2",
            "50,{height}*1/6,{width}*3/5,{height}*2/3",
            "0,{height}*3/4,{width},{height}/4",
            "{x},{y},{width}/2,{height}",
        ] {
            assert!(validate_layout(template).is_ok(), "{template}");
        }
    }

    #[test]
    fn three_fields_is_an_invalid_format() {
        let err = validate_layout("0,0,{width}/2").unwrap_err();
        assert_eq!(err, LayoutError::InvalidFormat {
            template: "0,0,{width}/2".into(),
            reason: FormatIssue::FieldCount(3),
        });
        assert!(err.to_string().starts_with("invalid layout format"));
        assert!(err.to_string().contains("exactly four"));
    }

    #[test]
    fn five_fields_is_an_invalid_format() {
        assert!(matches!(
            validate_layout("0,0,1,1,1"),
            Err(LayoutError::InvalidFormat { reason: FormatIssue::FieldCount(5), .. })
        ));
    }

    #[test]
    fn bad_field_names_the_index() {
        let err = validate_layout("0,0,{width}/2,{depth}").unwrap_err();
        assert_eq!(err, LayoutError::InvalidFormat {
            template: "0,0,{width}/2,{depth}".into(),
            reason: FormatIssue::Field {
                index: 3,
                source: ExprError::UnknownVariable("depth".into()),
            },
        });
        assert!(validate_layout("0,,1,1").is_err());
        assert!(validate_layout("0,0,{width}/{x},1").is_err());
    }

    #[test]
    fn evaluation_truncates_toward_zero() {
        let template: LayoutTemplate = "{width}/7,-{height}/7,{width}*2/3,{height}/3".parse().unwrap();
        let rect = template.evaluate(&Frame::CANONICAL).unwrap();
        assert_eq!(rect, RawRect { x: 274, y: -154, width: 1280, height: 360 });
    }

    #[test]
    fn values_beyond_i32_are_rejected() {
        let err = validate_layout("99999999999,0,{width},{height}").unwrap_err();
        assert_eq!(err, LayoutError::InvalidFormat {
            template: "99999999999,0,{width},{height}".into(),
            reason: FormatIssue::Field {
                index: 0,
                source: ExprError::OutOfRange(99999999999.0),
            },
        });
        assert!(validate_layout("0,0,{width}*{height}*{width},{height}").is_err());
        assert!(validate_layout("0,-2147483649,{width},{height}").is_err());

        let edges = validate_layout("-2147483648,2147483647.9,{width},{height}").unwrap();
        let rect = edges.evaluate(&Frame::CANONICAL).unwrap();
        assert_eq!((rect.x, rect.y), (i32::MIN, i32::MAX));
    }

    #[test]
    fn always_four_integers_for_positive_frames() {
        let template = LayoutTemplate::parse("{width}/3,{height}/3,{width}*2/3,{height}*2/3").unwrap();
        for (width, height) in [(1, 1), (7, 3), (1920, 1080), (2160, 3840), (5120, 1440)] {
            let frame = Frame { x: 0, y: 0, width, height };
            let rect = template.evaluate(&frame).unwrap();
            assert_eq!(rect.width, width * 2 / 3);
            assert_eq!(rect.height, height * 2 / 3);
        }
    }
}
