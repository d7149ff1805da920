use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An sRGB color with 8-bit channels, as written in hex notation by the properties panel.
/// Alpha ranges from `0` (transparent) to `255` (opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
	red: u8,
	green: u8,
	blue: u8,
	alpha: u8,
}

impl Color {
	pub const BLACK: Color = Color::from_rgb8(0, 0, 0);
	pub const WHITE: Color = Color::from_rgb8(255, 255, 255);
	pub const TRANSPARENT: Color = Color::from_rgba8(0, 0, 0, 0);

	/// Return a Color without transparency (alpha = 0xFF).
	/// # Examples
	/// ```
	/// use pixellab_document::color::Color;
	/// let color = Color::from_rgb8(0x4f, 0x46, 0xe5);
	/// let color2 = Color::from_rgba8(0x4f, 0x46, 0xe5, 0xFF);
	/// assert!(color == color2)
	/// ```
	pub const fn from_rgb8(red: u8, green: u8, blue: u8) -> Color {
		Color::from_rgba8(red, green, blue, 255)
	}

	pub const fn from_rgba8(red: u8, green: u8, blue: u8, alpha: u8) -> Color {
		Color { red, green, blue, alpha }
	}

	/// Parses `#rgb`, `#rrggbb` or `#rrggbbaa`. The leading `#` is required.
	/// # Examples
	/// ```
	/// use pixellab_document::color::Color;
	/// assert_eq!(Color::from_hex("#ec4899"), Some(Color::from_rgb8(0xec, 0x48, 0x99)));
	/// assert_eq!(Color::from_hex("#fff"), Some(Color::WHITE));
	/// assert_eq!(Color::from_hex("ec4899"), None);
	/// ```
	pub fn from_hex(color_str: &str) -> Option<Color> {
		let digits = color_str.strip_prefix('#')?;
		if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
			return None;
		}
		let channel = |index: usize| u8::from_str_radix(&digits[index..index + 2], 16).ok();
		match digits.len() {
			3 => {
				let mut expanded = digits.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
				let mut next = || expanded.next().flatten();
				Some(Color::from_rgb8(next()?, next()?, next()?))
			}
			6 => Some(Color::from_rgb8(channel(0)?, channel(2)?, channel(4)?)),
			8 => Some(Color::from_rgba8(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
			_ => None,
		}
	}

	pub fn r(&self) -> u8 {
		self.red
	}

	pub fn g(&self) -> u8 {
		self.green
	}

	pub fn b(&self) -> u8 {
		self.blue
	}

	pub fn a(&self) -> u8 {
		self.alpha
	}

	/// Alpha as a fraction in `[0, 1]`.
	pub fn alpha_f64(&self) -> f64 {
		self.alpha as f64 / 255.
	}

	pub fn to_rgba8(&self) -> [u8; 4] {
		[self.red, self.green, self.blue, self.alpha]
	}

	/// Return a String of lowercase hexadecimal value with two digit per components ("rrggbb").
	/// ```
	/// use pixellab_document::color::Color;
	/// let color = Color::from_rgba8(0x72, 0x67, 0x62, 0x61);
	/// assert!("726762" == color.rgb_hex())
	/// ```
	pub fn rgb_hex(&self) -> String {
		format!("{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
	}

	/// Returns `#rrggbb` for opaque colors and `#rrggbbaa` otherwise, so opaque colors round-trip to the notation the user typed.
	pub fn to_hex(&self) -> String {
		if self.alpha == 255 {
			format!("#{}", self.rgb_hex())
		} else {
			format!("#{}{:02x}", self.rgb_hex(), self.alpha)
		}
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_hex())
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidColor(pub String);

impl FromStr for Color {
	type Err = InvalidColor;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Color::from_hex(s).ok_or_else(|| InvalidColor(s.to_string()))
	}
}

impl Serialize for Color {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_hex())
	}
}

impl<'de> Deserialize<'de> for Color {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let string = String::deserialize(deserializer)?;
		Color::from_hex(&string).ok_or_else(|| serde::de::Error::custom(format!("invalid hex color `{string}`")))
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn parses_translucent_hex() {
		let color = Color::from_hex("#10b98180").unwrap();
		assert_eq!(color.to_rgba8(), [0x10, 0xb9, 0x81, 0x80]);
		assert_eq!(color.to_hex(), "#10b98180");
	}

	#[test]
	fn rejects_malformed_hex() {
		for input in ["", "#", "#12", "#12345", "#gggggg", "#ééé", "#+f+f+f", "4f46e5"] {
			assert_eq!(Color::from_hex(input), None, "{input}");
		}
	}

	#[test]
	fn uppercase_input_is_normalized() {
		assert_eq!(Color::from_hex("#4F46E5").unwrap().to_hex(), "#4f46e5");
	}
}
