//! Tooltip option set.
//!
//! [`TooltipOptions`] holds every display and behavior option with its default.
//! Static callers override options through [`OptionsPatch`], which cannot name
//! an unknown option. Callers that only have string keys (scripting layers,
//! JSON settings) go through [`TooltipOptions::apply_dynamic`], which validates
//! every key and value before anything is applied.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::constants::*;
use crate::error::{Result, TooltipError};

/// Where the text is placed inside the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
    #[default]
    Center,
}

impl Anchor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Anchor::N => "n",
            Anchor::Ne => "ne",
            Anchor::E => "e",
            Anchor::Se => "se",
            Anchor::S => "s",
            Anchor::Sw => "sw",
            Anchor::W => "w",
            Anchor::Nw => "nw",
            Anchor::Center => "center",
        }
    }
}

/// Alignment of multi-line text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Justify {
    #[default]
    Left,
    Right,
    Center,
}

impl Justify {
    pub fn as_str(&self) -> &'static str {
        match self {
            Justify::Left => "left",
            Justify::Right => "right",
            Justify::Center => "center",
        }
    }
}

/// Border style of the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Relief {
    Flat,
    Ridge,
    Groove,
    Raised,
    Sunken,
    #[default]
    Solid,
}

impl Relief {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relief::Flat => "flat",
            Relief::Ridge => "ridge",
            Relief::Groove => "groove",
            Relief::Raised => "raised",
            Relief::Sunken => "sunken",
            Relief::Solid => "solid",
        }
    }
}

/// Whether the tooltip may appear at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TooltipState {
    #[default]
    Normal,
    Disabled,
}

impl TooltipState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TooltipState::Normal => "normal",
            TooltipState::Disabled => "disabled",
        }
    }
}

/// Shared, mutable text cell.
///
/// When bound to a tooltip its current value replaces the `text` option each
/// time the popup is built, so the owner can update the text without calling
/// `configure`. Clones share the same cell.
#[derive(Clone, Default)]
pub struct TextVariable(Rc<RefCell<String>>);

impl TextVariable {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Rc::new(RefCell::new(value.into())))
    }

    /// Current value.
    pub fn get(&self) -> String {
        self.0.borrow().clone()
    }

    /// Replace the value.
    pub fn set(&self, value: impl Into<String>) {
        *self.0.borrow_mut() = value.into();
    }
}

impl PartialEq for TextVariable {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for TextVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TextVariable").field(&*self.0.borrow()).finish()
    }
}

/// Recognized option keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionKey {
    Anchor,
    BorderWidth,
    Background,
    Delay,
    Foreground,
    FollowMouse,
    Font,
    Justify,
    Padx,
    Pady,
    Relief,
    State,
    Text,
    TextVariable,
    Width,
    WrapLength,
}

impl OptionKey {
    /// Every recognized key.
    pub const ALL: [OptionKey; 16] = [
        OptionKey::Anchor,
        OptionKey::BorderWidth,
        OptionKey::Background,
        OptionKey::Delay,
        OptionKey::Foreground,
        OptionKey::FollowMouse,
        OptionKey::Font,
        OptionKey::Justify,
        OptionKey::Padx,
        OptionKey::Pady,
        OptionKey::Relief,
        OptionKey::State,
        OptionKey::Text,
        OptionKey::TextVariable,
        OptionKey::Width,
        OptionKey::WrapLength,
    ];

    /// Key name as used by the string-keyed entry point.
    pub fn name(&self) -> &'static str {
        match self {
            OptionKey::Anchor => "anchor",
            OptionKey::BorderWidth => "bd",
            OptionKey::Background => "bg",
            OptionKey::Delay => "delay",
            OptionKey::Foreground => "fg",
            OptionKey::FollowMouse => "follow_mouse",
            OptionKey::Font => "font",
            OptionKey::Justify => "justify",
            OptionKey::Padx => "padx",
            OptionKey::Pady => "pady",
            OptionKey::Relief => "relief",
            OptionKey::State => "state",
            OptionKey::Text => "text",
            OptionKey::TextVariable => "textvariable",
            OptionKey::Width => "width",
            OptionKey::WrapLength => "wraplength",
        }
    }
}

impl FromStr for OptionKey {
    type Err = TooltipError;

    fn from_str(key: &str) -> Result<Self> {
        OptionKey::ALL
            .into_iter()
            .find(|k| k.name() == key)
            .ok_or_else(|| TooltipError::unknown_option(key))
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Boolean that also accepts `0`/`1`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

impl From<Flag> for bool {
    fn from(flag: Flag) -> Self {
        match flag {
            Flag::Bool(b) => b,
            Flag::Int(i) => i != 0,
        }
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Flag::deserialize(deserializer).map(bool::from)
}

/// Complete option set of one tooltip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TooltipOptions {
    /// Text placement inside the popup
    pub anchor: Anchor,
    /// Border width
    #[serde(rename = "bd")]
    pub border_width: u32,
    /// Background color
    #[serde(rename = "bg")]
    pub background: String,
    /// Hover delay in milliseconds
    #[serde(rename = "delay")]
    pub delay_ms: u64,
    /// Text color
    #[serde(rename = "fg")]
    pub foreground: String,
    /// Track the pointer while visible; only read when the tooltip is attached
    #[serde(deserialize_with = "deserialize_flag")]
    pub follow_mouse: bool,
    /// Font description, toolkit default when unset
    pub font: Option<String>,
    /// Multi-line alignment
    pub justify: Justify,
    /// Horizontal inner padding
    pub padx: u32,
    /// Vertical inner padding
    pub pady: u32,
    /// Border style
    pub relief: Relief,
    /// `Disabled` suppresses the popup entirely
    pub state: TooltipState,
    /// Displayed text
    pub text: String,
    /// Shared text overriding `text` when bound
    #[serde(skip)]
    pub textvariable: Option<TextVariable>,
    /// Fixed width in characters, 0 to wrap at `wraplength`
    pub width: u32,
    /// Wrap limit in screen units
    pub wraplength: u32,
}

impl Default for TooltipOptions {
    fn default() -> Self {
        Self {
            anchor: Anchor::default(),
            border_width: DEFAULT_BORDER_WIDTH,
            background: DEFAULT_BACKGROUND.to_string(),
            delay_ms: DEFAULT_DELAY_MS,
            foreground: DEFAULT_FOREGROUND.to_string(),
            follow_mouse: false,
            font: None,
            justify: Justify::default(),
            padx: DEFAULT_PADX,
            pady: DEFAULT_PADY,
            relief: Relief::default(),
            state: TooltipState::default(),
            text: DEFAULT_TEXT.to_string(),
            textvariable: None,
            width: 0,
            wraplength: DEFAULT_WRAPLENGTH,
        }
    }
}

impl TooltipOptions {
    /// Create an option set with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with the given text and hover delay.
    pub fn with_text(text: impl Into<String>, delay_ms: u64) -> Self {
        Self {
            text: text.into(),
            delay_ms,
            ..Self::default()
        }
    }

    /// Text shown in the popup: the bound variable's value, else `text`.
    pub fn display_text(&self) -> String {
        match &self.textvariable {
            Some(var) => var.get(),
            None => self.text.clone(),
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.state == TooltipState::Disabled
    }

    /// Current value of one option.
    pub fn get(&self, key: OptionKey) -> Value {
        match key {
            OptionKey::Anchor => Value::from(self.anchor.as_str()),
            OptionKey::BorderWidth => Value::from(self.border_width),
            OptionKey::Background => Value::from(self.background.as_str()),
            OptionKey::Delay => Value::from(self.delay_ms),
            OptionKey::Foreground => Value::from(self.foreground.as_str()),
            OptionKey::FollowMouse => Value::from(self.follow_mouse),
            OptionKey::Font => self.font.as_deref().map_or(Value::Null, Value::from),
            OptionKey::Justify => Value::from(self.justify.as_str()),
            OptionKey::Padx => Value::from(self.padx),
            OptionKey::Pady => Value::from(self.pady),
            OptionKey::Relief => Value::from(self.relief.as_str()),
            OptionKey::State => Value::from(self.state.as_str()),
            OptionKey::Text => Value::from(self.text.as_str()),
            OptionKey::TextVariable => self
                .textvariable
                .as_ref()
                .map_or(Value::Null, |var| Value::from(var.get())),
            OptionKey::Width => Value::from(self.width),
            OptionKey::WrapLength => Value::from(self.wraplength),
        }
    }

    /// Every option keyed by its string name.
    pub fn option_map(&self) -> BTreeMap<&'static str, Value> {
        OptionKey::ALL
            .into_iter()
            .map(|key| (key.name(), self.get(key)))
            .collect()
    }

    /// Set one option from a string key and a loosely typed value.
    ///
    /// Text variables cannot be created from a plain value; only `null`
    /// (unbind) is accepted for `textvariable`.
    pub fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let option = key.parse::<OptionKey>()?;
        match option {
            OptionKey::Anchor => self.anchor = decode(option, value)?,
            OptionKey::BorderWidth => self.border_width = decode(option, value)?,
            OptionKey::Background => self.background = decode(option, value)?,
            OptionKey::Delay => self.delay_ms = decode(option, value)?,
            OptionKey::Foreground => self.foreground = decode(option, value)?,
            OptionKey::FollowMouse => self.follow_mouse = decode::<Flag>(option, value)?.into(),
            OptionKey::Font => self.font = decode(option, value)?,
            OptionKey::Justify => self.justify = decode(option, value)?,
            OptionKey::Padx => self.padx = decode(option, value)?,
            OptionKey::Pady => self.pady = decode(option, value)?,
            OptionKey::Relief => self.relief = decode(option, value)?,
            OptionKey::State => self.state = decode(option, value)?,
            OptionKey::Text => self.text = decode(option, value)?,
            OptionKey::TextVariable => {
                if !value.is_null() {
                    return Err(TooltipError::invalid_value(
                        option.name(),
                        "text variables can only be bound through OptionsPatch",
                    ));
                }
                self.textvariable = None;
            }
            OptionKey::Width => self.width = decode(option, value)?,
            OptionKey::WrapLength => self.wraplength = decode(option, value)?,
        }
        Ok(())
    }

    /// Apply several string-keyed options at once.
    ///
    /// All-or-nothing: if any key is unknown or any value is rejected, the
    /// option set is left exactly as it was.
    pub fn apply_dynamic<I, K>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut staged = self.clone();
        for (key, value) in pairs {
            staged.set(key.as_ref(), value)?;
        }
        *self = staged;
        Ok(())
    }

    /// Serialize the options to JSON. Bound text variables are not included.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize options from JSON; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn decode<T: DeserializeOwned>(key: OptionKey, value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| TooltipError::invalid_value(key.name(), e.to_string()))
}

/// Typed overrides merged into a [`TooltipOptions`].
///
/// Unset fields leave the target untouched.
///
/// ```ignore
/// let patch = OptionsPatch::new().follow_mouse(true).background("white");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionsPatch {
    pub anchor: Option<Anchor>,
    pub border_width: Option<u32>,
    pub background: Option<String>,
    pub delay_ms: Option<u64>,
    pub foreground: Option<String>,
    pub follow_mouse: Option<bool>,
    pub font: Option<String>,
    pub justify: Option<Justify>,
    pub padx: Option<u32>,
    pub pady: Option<u32>,
    pub relief: Option<Relief>,
    pub state: Option<TooltipState>,
    pub text: Option<String>,
    pub textvariable: Option<TextVariable>,
    pub width: Option<u32>,
    pub wraplength: Option<u32>,
}

impl OptionsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    builder_option!(anchor, Anchor);
    builder_option!(border_width, u32);
    builder_option!(background, into String);
    builder_option!(delay_ms, u64);
    builder_option!(foreground, into String);
    builder_option!(follow_mouse, bool);
    builder_option!(font, into String);
    builder_option!(justify, Justify);
    builder_option!(padx, u32);
    builder_option!(pady, u32);
    builder_option!(relief, Relief);
    builder_option!(state, TooltipState);
    builder_option!(text, into String);
    builder_option!(textvariable, TextVariable);
    builder_option!(width, u32);
    builder_option!(wraplength, u32);

    /// Merge the set fields into `options`.
    pub fn apply(self, options: &mut TooltipOptions) {
        let Self {
            anchor,
            border_width,
            background,
            delay_ms,
            foreground,
            follow_mouse,
            font,
            justify,
            padx,
            pady,
            relief,
            state,
            text,
            textvariable,
            width,
            wraplength,
        } = self;

        if let Some(v) = anchor {
            options.anchor = v;
        }
        if let Some(v) = border_width {
            options.border_width = v;
        }
        if let Some(v) = background {
            options.background = v;
        }
        if let Some(v) = delay_ms {
            options.delay_ms = v;
        }
        if let Some(v) = foreground {
            options.foreground = v;
        }
        if let Some(v) = follow_mouse {
            options.follow_mouse = v;
        }
        if let Some(v) = font {
            options.font = Some(v);
        }
        if let Some(v) = justify {
            options.justify = v;
        }
        if let Some(v) = padx {
            options.padx = v;
        }
        if let Some(v) = pady {
            options.pady = v;
        }
        if let Some(v) = relief {
            options.relief = v;
        }
        if let Some(v) = state {
            options.state = v;
        }
        if let Some(v) = text {
            options.text = v;
        }
        if let Some(v) = textvariable {
            options.textvariable = Some(v);
        }
        if let Some(v) = width {
            options.width = v;
        }
        if let Some(v) = wraplength {
            options.wraplength = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let opts = TooltipOptions::default();
        assert_eq!(opts.anchor, Anchor::Center);
        assert_eq!(opts.border_width, 1);
        assert_eq!(opts.background, "lightyellow");
        assert_eq!(opts.delay_ms, 1500);
        assert_eq!(opts.foreground, "black");
        assert!(!opts.follow_mouse);
        assert_eq!(opts.justify, Justify::Left);
        assert_eq!(opts.padx, 4);
        assert_eq!(opts.pady, 2);
        assert_eq!(opts.relief, Relief::Solid);
        assert_eq!(opts.state, TooltipState::Normal);
        assert_eq!(opts.text, "Your text here");
        assert_eq!(opts.width, 0);
        assert_eq!(opts.wraplength, 150);
    }

    #[test]
    fn test_option_key_names_round_trip() {
        for key in OptionKey::ALL {
            assert_eq!(key.name().parse::<OptionKey>().ok(), Some(key));
        }
        assert!(matches!(
            "background".parse::<OptionKey>(),
            Err(TooltipError::UnknownOption { key }) if key == "background"
        ));
    }

    #[test]
    fn test_option_map_lists_every_key() {
        let map = TooltipOptions::with_text("hello", 300).option_map();
        assert_eq!(map.len(), OptionKey::ALL.len());
        assert_eq!(map["text"], json!("hello"));
        assert_eq!(map["delay"], json!(300));
        assert_eq!(map["font"], Value::Null);
        assert_eq!(map["textvariable"], Value::Null);
        assert_eq!(map["state"], json!("normal"));
    }

    #[test]
    fn test_set_recognized_keys() {
        let mut opts = TooltipOptions::default();
        opts.set("bg", json!("white")).unwrap();
        opts.set("relief", json!("groove")).unwrap();
        opts.set("state", json!("disabled")).unwrap();
        opts.set("font", json!("Helvetica 10")).unwrap();
        assert_eq!(opts.background, "white");
        assert_eq!(opts.relief, Relief::Groove);
        assert!(opts.is_disabled());
        assert_eq!(opts.font.as_deref(), Some("Helvetica 10"));
    }

    #[test]
    fn test_follow_mouse_accepts_integers() {
        let mut opts = TooltipOptions::default();
        opts.set("follow_mouse", json!(1)).unwrap();
        assert!(opts.follow_mouse);
        opts.set("follow_mouse", json!(0)).unwrap();
        assert!(!opts.follow_mouse);
        opts.set("follow_mouse", json!(true)).unwrap();
        assert!(opts.follow_mouse);
    }

    #[test]
    fn test_set_rejects_wrong_shape() {
        let mut opts = TooltipOptions::default();
        let err = opts.set("padx", json!("wide")).unwrap_err();
        assert!(matches!(err, TooltipError::InvalidValue { ref key, .. } if key == "padx"));
        let err = opts.set("justify", json!("middle")).unwrap_err();
        assert!(matches!(err, TooltipError::InvalidValue { ref key, .. } if key == "justify"));
        assert_eq!(opts, TooltipOptions::default());
    }

    #[test]
    fn test_apply_dynamic_unknown_key_is_all_or_nothing() {
        let mut opts = TooltipOptions::default();
        let err = opts
            .apply_dynamic([("bg", json!("white")), ("foo", json!(1))])
            .unwrap_err();

        assert!(matches!(err, TooltipError::UnknownOption { ref key } if key == "foo"));
        // The recognized key before "foo" was not applied either
        assert_eq!(opts.background, "lightyellow");
    }

    #[test]
    fn test_apply_dynamic_applies_all_valid_keys() {
        let mut opts = TooltipOptions::default();
        opts.apply_dynamic([("text", json!("Save")), ("delay", json!(250))])
            .unwrap();
        assert_eq!(opts.text, "Save");
        assert_eq!(opts.delay_ms, 250);
    }

    #[test]
    fn test_textvariable_overrides_text() {
        let var = TextVariable::new("first");
        let mut opts = TooltipOptions::with_text("static", 100);
        OptionsPatch::new().textvariable(var.clone()).apply(&mut opts);
        assert_eq!(opts.display_text(), "first");

        var.set("second");
        assert_eq!(opts.display_text(), "second");
        assert_eq!(opts.get(OptionKey::TextVariable), json!("second"));

        // Only unbinding is possible through string keys
        assert!(opts.set("textvariable", json!("x")).is_err());
        opts.set("textvariable", Value::Null).unwrap();
        assert_eq!(opts.display_text(), "static");
    }

    #[test]
    fn test_patch_only_touches_set_fields() {
        let mut opts = TooltipOptions::with_text("keep", 700);
        OptionsPatch::new()
            .foreground("navy")
            .padx(10)
            .apply(&mut opts);

        assert_eq!(opts.foreground, "navy");
        assert_eq!(opts.padx, 10);
        assert_eq!(opts.text, "keep");
        assert_eq!(opts.delay_ms, 700);
        assert_eq!(opts.background, "lightyellow");
    }

    #[test]
    fn test_json_uses_option_names() {
        let opts =
            TooltipOptions::from_json(r#"{ "bg": "white", "follow_mouse": 1, "delay": 200 }"#)
                .unwrap();
        assert_eq!(opts.background, "white");
        assert!(opts.follow_mouse);
        assert_eq!(opts.delay_ms, 200);
        assert_eq!(opts.wraplength, 150);

        let json = opts.to_json().unwrap();
        assert!(json.contains("\"bg\": \"white\""));
        assert_eq!(TooltipOptions::from_json(&json).unwrap(), opts);
    }

    #[test]
    fn test_json_rejects_unknown_keys() {
        let err = TooltipOptions::from_json(r#"{ "foo": 1 }"#).unwrap_err();
        assert!(matches!(err, TooltipError::Parse(_)));
    }
}
