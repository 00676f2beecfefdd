//! Browser locale: `String.prototype.localeCompare` and `Date.prototype.toLocaleString`.

use std::cmp::Ordering;

use js_sys::{Array, Date, JsString, Object};
use tips_core::Locale;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsLocale;

impl Locale for JsLocale {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        JsString::from(a).locale_compare(b, &Array::new(), &Object::new()).cmp(&0)
    }

    fn format_date(&self, raw: &str) -> String {
        let date = Date::new(&JsValue::from_str(raw));
        if date.get_time().is_nan() {
            return raw.to_string();
        }
        date.to_locale_string("default", &JsValue::UNDEFINED).into()
    }
}
