use crate::color::Color;
use crate::DocumentError;

use std::fmt;
use std::str::FromStr;

/// Every editable (or inspectable) field of an entity, named as in the persisted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
	X,
	Y,
	RotationDegrees,
	Opacity,
	Name,
	Content,
	FontFamily,
	FontSizePx,
	WidthPx,
	HeightPx,
	RadiusPx,
	PathData,
	FillColor,
	StrokeColor,
	StrokeWidthPx,
	ScaleX,
	ScaleY,
	IntrinsicWidthPx,
	IntrinsicHeightPx,
	Handle,
}

impl PropertyKey {
	pub const ALL: [PropertyKey; 20] = [
		PropertyKey::X,
		PropertyKey::Y,
		PropertyKey::RotationDegrees,
		PropertyKey::Opacity,
		PropertyKey::Name,
		PropertyKey::Content,
		PropertyKey::FontFamily,
		PropertyKey::FontSizePx,
		PropertyKey::WidthPx,
		PropertyKey::HeightPx,
		PropertyKey::RadiusPx,
		PropertyKey::PathData,
		PropertyKey::FillColor,
		PropertyKey::StrokeColor,
		PropertyKey::StrokeWidthPx,
		PropertyKey::ScaleX,
		PropertyKey::ScaleY,
		PropertyKey::IntrinsicWidthPx,
		PropertyKey::IntrinsicHeightPx,
		PropertyKey::Handle,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			PropertyKey::X => "x",
			PropertyKey::Y => "y",
			PropertyKey::RotationDegrees => "rotationDegrees",
			PropertyKey::Opacity => "opacity",
			PropertyKey::Name => "name",
			PropertyKey::Content => "content",
			PropertyKey::FontFamily => "fontFamily",
			PropertyKey::FontSizePx => "fontSizePx",
			PropertyKey::WidthPx => "widthPx",
			PropertyKey::HeightPx => "heightPx",
			PropertyKey::RadiusPx => "radiusPx",
			PropertyKey::PathData => "pathData",
			PropertyKey::FillColor => "fillColor",
			PropertyKey::StrokeColor => "strokeColor",
			PropertyKey::StrokeWidthPx => "strokeWidthPx",
			PropertyKey::ScaleX => "scaleX",
			PropertyKey::ScaleY => "scaleY",
			PropertyKey::IntrinsicWidthPx => "intrinsicWidthPx",
			PropertyKey::IntrinsicHeightPx => "intrinsicHeightPx",
			PropertyKey::Handle => "handle",
		}
	}
}

impl fmt::Display for PropertyKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPropertyKey(pub String);

impl FromStr for PropertyKey {
	type Err = UnknownPropertyKey;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		PropertyKey::ALL.into_iter().find(|key| key.as_str() == s).ok_or_else(|| UnknownPropertyKey(s.to_string()))
	}
}

/// A value written to (or read from) an entity property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
	Number(f64),
	Text(String),
	/// `None` removes the paint.
	Color(Option<Color>),
}

impl PropertyValue {
	pub(crate) fn as_number(&self, key: PropertyKey) -> Result<f64, DocumentError> {
		match self {
			PropertyValue::Number(number) => Ok(*number),
			other => Err(DocumentError::invalid_value(key.as_str(), format!("expected a number, got {other:?}"))),
		}
	}

	pub(crate) fn as_text(&self, key: PropertyKey) -> Result<&str, DocumentError> {
		match self {
			PropertyValue::Text(text) => Ok(text),
			other => Err(DocumentError::invalid_value(key.as_str(), format!("expected a string, got {other:?}"))),
		}
	}

	/// Colors may also be given in hex notation, where an empty string means no paint.
	pub(crate) fn as_color(&self, key: PropertyKey) -> Result<Option<Color>, DocumentError> {
		match self {
			PropertyValue::Color(color) => Ok(*color),
			PropertyValue::Text(text) if text.is_empty() => Ok(None),
			PropertyValue::Text(text) => Color::from_hex(text).map(Some).ok_or_else(|| DocumentError::invalid_value(key.as_str(), format!("`{text}` is not a hex color"))),
			other => Err(DocumentError::invalid_value(key.as_str(), format!("expected a color, got {other:?}"))),
		}
	}
}

impl From<f64> for PropertyValue {
	fn from(value: f64) -> Self {
		PropertyValue::Number(value)
	}
}

impl From<&str> for PropertyValue {
	fn from(value: &str) -> Self {
		PropertyValue::Text(value.to_string())
	}
}

impl From<String> for PropertyValue {
	fn from(value: String) -> Self {
		PropertyValue::Text(value)
	}
}

impl From<Color> for PropertyValue {
	fn from(value: Color) -> Self {
		PropertyValue::Color(Some(value))
	}
}

impl From<Option<Color>> for PropertyValue {
	fn from(value: Option<Color>) -> Self {
		PropertyValue::Color(value)
	}
}

// Domain checks shared by `set_property`, entity validation, and the decoder.

pub(crate) fn finite(key: PropertyKey, value: f64) -> Result<f64, DocumentError> {
	if value.is_finite() { Ok(value) } else { Err(DocumentError::invalid_value(key.as_str(), format!("{value} is not finite"))) }
}

pub(crate) fn positive(key: PropertyKey, value: f64) -> Result<f64, DocumentError> {
	if finite(key, value)? > 0. { Ok(value) } else { Err(DocumentError::invalid_value(key.as_str(), format!("{value} must be greater than 0"))) }
}

pub(crate) fn non_negative(key: PropertyKey, value: f64) -> Result<f64, DocumentError> {
	if finite(key, value)? >= 0. { Ok(value) } else { Err(DocumentError::invalid_value(key.as_str(), format!("{value} must not be negative"))) }
}

pub(crate) fn unit_interval(key: PropertyKey, value: f64) -> Result<f64, DocumentError> {
	if (0. ..=1.).contains(&finite(key, value)?) {
		Ok(value)
	} else {
		Err(DocumentError::invalid_value(key.as_str(), format!("{value} is outside [0, 1]")))
	}
}

/// Wraps any finite angle into `[0, 360)`.
pub(crate) fn rotation(value: f64) -> Result<f64, DocumentError> {
	let wrapped = finite(PropertyKey::RotationDegrees, value)?.rem_euclid(360.);
	// `rem_euclid` rounds tiny negative angles up to exactly 360
	Ok(if wrapped >= 360. { 0. } else { wrapped })
}

pub(crate) fn non_empty(key: PropertyKey, value: &str) -> Result<String, DocumentError> {
	if value.trim().is_empty() {
		Err(DocumentError::invalid_value(key.as_str(), "must not be empty"))
	} else {
		Ok(value.to_string())
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn keys_parse_from_their_names() {
		for key in PropertyKey::ALL {
			assert_eq!(key.as_str().parse::<PropertyKey>(), Ok(key));
		}
		assert!("fontSize".parse::<PropertyKey>().is_err());
	}

	#[test]
	fn rotation_wraps_into_range() {
		assert_eq!(rotation(360.).unwrap(), 0.);
		assert_eq!(rotation(-90.).unwrap(), 270.);
		assert_eq!(rotation(725.).unwrap(), 5.);
		assert_eq!(rotation(-1e-20).unwrap(), 0.);
		assert!(rotation(f64::NAN).is_err());
	}

	#[test]
	fn colors_accept_hex_strings() {
		let key = PropertyKey::FillColor;
		assert_eq!(PropertyValue::from("#000").as_color(key).unwrap(), Some(Color::BLACK));
		assert_eq!(PropertyValue::from("").as_color(key).unwrap(), None);
		assert!(PropertyValue::from("black").as_color(key).is_err());
		assert!(PropertyValue::Number(0.).as_color(key).is_err());
	}

	#[test]
	fn opacity_domain() {
		assert!(unit_interval(PropertyKey::Opacity, 1.5).is_err());
		assert!(unit_interval(PropertyKey::Opacity, -0.1).is_err());
		assert_eq!(unit_interval(PropertyKey::Opacity, 0.).unwrap(), 0.);
	}
}
