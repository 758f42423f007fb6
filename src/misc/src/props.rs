use anyhow::{Result, bail};
use std::ops::Deref;

const PROP_VALUE_MAX: usize = 92;

// https://cs.android.com/android/platform/superproject/main/+/main:system/libbase/parsebool.cpp;l=23-31;drc=61197364367c9e404c7da6900658f1b16c42d0da
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "y" | "yes" | "on" | "true" => Some(true),
        "0" | "n" | "no" | "off" | "false" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property(String);

impl From<Property> for bool {
    fn from(value: Property) -> Self {
        value.as_bool().unwrap_or_default()
    }
}

impl Property {
    pub fn as_bool(&self) -> Option<bool> {
        parse_bool(self)
    }
}

impl Deref for Property {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

#[cfg(target_os = "android")]
mod backend {
    use super::PROP_VALUE_MAX;
    use std::ffi::{CStr, CString, c_char, c_int};

    unsafe extern "C" {
        fn __system_property_get(name: *const c_char, value: *mut c_char) -> c_int;
        fn __system_property_set(name: *const c_char, value: *const c_char) -> c_int;
    }

    pub fn get(name: &str) -> Option<String> {
        let name = CString::new(name).ok()?;
        let mut buffer = [0u8; PROP_VALUE_MAX + 1];

        let len = unsafe { __system_property_get(name.as_ptr(), buffer.as_mut_ptr() as _) };

        if len <= 0 {
            return None;
        }

        let value = CStr::from_bytes_until_nul(&buffer).ok()?;
        Some(value.to_string_lossy().into_owned())
    }

    pub fn set(name: &str, value: &str) -> bool {
        let (Ok(name), Ok(value)) = (CString::new(name), CString::new(value)) else {
            return false;
        };

        unsafe { __system_property_set(name.as_ptr(), value.as_ptr()) == 0 }
    }
}

// Process-local property area for host builds.
#[cfg(not(target_os = "android"))]
mod backend {
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::LazyLock;

    static PROPS: LazyLock<Mutex<HashMap<String, String>>> =
        LazyLock::new(|| Mutex::new(HashMap::new()));

    pub fn get(name: &str) -> Option<String> {
        PROPS.lock().get(name).filter(|v| !v.is_empty()).cloned()
    }

    pub fn set(name: &str, value: &str) -> bool {
        PROPS.lock().insert(name.into(), value.into());
        true
    }
}

pub fn get(name: &str) -> Option<Property> {
    backend::get(name).map(Property)
}

pub fn set(name: &str, value: &str) -> Result<()> {
    if value.len() >= PROP_VALUE_MAX {
        bail!("value too long for {name}: {} bytes", value.len());
    }

    if !backend::set(name, value) {
        bail!("failed to set {name}={value}");
    }

    Ok(())
}

pub fn prop_on(name: &str) -> bool {
    get(name).map(|it| it.into()).unwrap_or_default()
}
