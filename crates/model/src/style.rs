//! Display settings of a well.
//!
//! The option set is fixed. Values are stored verbatim and never interpreted;
//! a rendering collaborator decides what `"C0"` or `"--"` means.

use std::fmt;

/// A recognised style option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleOption {
    Color,
    Linestyle,
    Linewidth,
    Label,
    Alpha,
    Marker,
    Markersize,
}

impl StyleOption {
    /// Every option, in canonical order.
    pub const ALL: [StyleOption; 7] = [
        StyleOption::Color,
        StyleOption::Linestyle,
        StyleOption::Linewidth,
        StyleOption::Label,
        StyleOption::Alpha,
        StyleOption::Marker,
        StyleOption::Markersize,
    ];

    /// Key used in option maps and files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Linestyle => "linestyle",
            Self::Linewidth => "linewidth",
            Self::Label => "label",
            Self::Alpha => "alpha",
            Self::Marker => "marker",
            Self::Markersize => "markersize",
        }
    }

    /// Looks up an option by key (exact, lower-case match).
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.as_str() == key)
    }

    /// Returns `true` for options holding a number.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Linewidth | Self::Alpha | Self::Markersize)
    }
}

impl fmt::Display for StyleOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A style option value.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Text(String),
    Number(f64),
}

impl StyleValue {
    fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Number(_) => "number",
        }
    }
}

impl From<&str> for StyleValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for StyleValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

/// Error from [`Style::set_kwargs`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StyleError {
    /// The key is not one of [`StyleOption::ALL`].
    #[error("unknown style option '{key}'")]
    UnknownOption {
        /// The rejected key.
        key: String,
    },

    /// The value kind does not match the option, or a number is not finite.
    #[error("style option '{option}' expects a {expected}, got a {got}")]
    InvalidValue {
        /// The option being set.
        option: StyleOption,
        /// Expected kind.
        expected: &'static str,
        /// Supplied kind.
        got: &'static str,
    },
}

impl StyleError {
    /// Attaches the well name, producing the model-level error.
    pub(crate) fn for_well(self, well: &str) -> crate::ModelError {
        match self {
            StyleError::UnknownOption { key } => crate::ModelError::UnknownStyleOption {
                well: well.to_string(),
                key,
            },
            StyleError::InvalidValue {
                option, expected, ..
            } => crate::ModelError::InvalidStyleValue {
                well: well.to_string(),
                option: option.to_string(),
                expected: expected.to_string(),
            },
        }
    }
}

/// Plot settings of one well.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub color: Option<String>,
    pub linestyle: Option<String>,
    pub linewidth: f64,
    pub label: Option<String>,
    pub alpha: f64,
    pub marker: Option<String>,
    pub markersize: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: None,
            linestyle: None,
            linewidth: 1.0,
            label: None,
            alpha: 1.0,
            marker: None,
            markersize: 6.0,
        }
    }
}

impl Style {
    /// Current value of `option`, or `None` for an unset text option.
    pub fn get(&self, option: StyleOption) -> Option<StyleValue> {
        let text = |v: &Option<String>| v.clone().map(StyleValue::Text);
        match option {
            StyleOption::Color => text(&self.color),
            StyleOption::Linestyle => text(&self.linestyle),
            StyleOption::Label => text(&self.label),
            StyleOption::Marker => text(&self.marker),
            StyleOption::Linewidth => Some(StyleValue::Number(self.linewidth)),
            StyleOption::Alpha => Some(StyleValue::Number(self.alpha)),
            StyleOption::Markersize => Some(StyleValue::Number(self.markersize)),
        }
    }

    /// Applies several options at once.
    ///
    /// Every key and value is checked before anything changes, so on error
    /// the style is left untouched.
    ///
    /// # Errors
    ///
    /// - [`StyleError::UnknownOption`] if any key is not a style option
    ///   (reported before value errors).
    /// - [`StyleError::InvalidValue`] if a value has the wrong kind or is a
    ///   NaN or infinite number.
    pub fn set_kwargs<I, K, V>(&mut self, options: I) -> Result<(), StyleError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<StyleValue>,
    {
        let raw: Vec<(K, StyleValue)> = options.into_iter().map(|(k, v)| (k, v.into())).collect();

        let mut resolved = Vec::with_capacity(raw.len());
        for (key, value) in raw {
            let option = StyleOption::from_key(key.as_ref()).ok_or_else(|| {
                StyleError::UnknownOption {
                    key: key.as_ref().to_string(),
                }
            })?;
            resolved.push((option, value));
        }
        for (option, value) in &resolved {
            check_kind(*option, value)?;
        }

        for (option, value) in resolved {
            self.apply(option, value);
        }
        Ok(())
    }

    /// Checks that every numeric option is finite.
    ///
    /// The fields are public, so a style built by hand is checked when it is
    /// handed to a well or a model.
    ///
    /// # Errors
    ///
    /// [`StyleError::InvalidValue`] for the first non-finite option.
    pub fn validate(&self) -> Result<(), StyleError> {
        StyleOption::ALL
            .into_iter()
            .filter(|o| o.is_numeric())
            .filter_map(|o| self.get(o).map(|v| (o, v)))
            .try_for_each(|(option, value)| check_kind(option, &value))
    }

    /// Options whose value differs from [`Style::default`], in canonical order.
    pub fn non_default_entries(&self) -> Vec<(StyleOption, StyleValue)> {
        let defaults = Style::default();
        StyleOption::ALL
            .into_iter()
            .filter_map(|option| {
                let value = self.get(option)?;
                (defaults.get(option).as_ref() != Some(&value)).then_some((option, value))
            })
            .collect()
    }

    fn apply(&mut self, option: StyleOption, value: StyleValue) {
        match (option, value) {
            (StyleOption::Color, StyleValue::Text(s)) => self.color = Some(s),
            (StyleOption::Linestyle, StyleValue::Text(s)) => self.linestyle = Some(s),
            (StyleOption::Label, StyleValue::Text(s)) => self.label = Some(s),
            (StyleOption::Marker, StyleValue::Text(s)) => self.marker = Some(s),
            (StyleOption::Linewidth, StyleValue::Number(v)) => self.linewidth = v,
            (StyleOption::Alpha, StyleValue::Number(v)) => self.alpha = v,
            (StyleOption::Markersize, StyleValue::Number(v)) => self.markersize = v,
            // kinds are checked before apply
            _ => {}
        }
    }
}

fn check_kind(option: StyleOption, value: &StyleValue) -> Result<(), StyleError> {
    let expected = if option.is_numeric() { "number" } else { "text" };
    if value.kind() != expected {
        return Err(StyleError::InvalidValue {
            option,
            expected,
            got: value.kind(),
        });
    }
    if let StyleValue::Number(v) = value
        && !v.is_finite()
    {
        return Err(StyleError::InvalidValue {
            option,
            expected: "finite number",
            got: "non-finite number",
        });
    }
    Ok(())
}
