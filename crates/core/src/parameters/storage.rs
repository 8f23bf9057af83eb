//! Named parameter store
//!
//! Every tunable (shot timing, flywheel presets, drive geometry, autonomous
//! options) is registered here with its default at startup. The host may
//! then override values before the op mode is built; each parameter block
//! reads itself back out with `from_store`, clamping out-of-range values.
//!
//! Backed by a fixed-capacity `heapless` index map, so registration order is
//! preserved and nothing allocates.

use bitflags::bitflags;
use heapless::index_map::FnvIndexMap;
use heapless::String;

use super::error::ParameterError;

/// Longest accepted parameter name
pub const PARAM_NAME_LEN: usize = 16;

/// Store capacity (power of two, required by the index map)
pub const MAX_PARAMS: usize = 32;

type Name = String<PARAM_NAME_LEN>;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ParamFlags: u8 {
        /// Fixed at registration; `set` is rejected
        const READ_ONLY = 1 << 0;
    }
}

/// Parameter value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i32),
    Float(f32),
}

impl ParamValue {
    /// Numeric view; booleans read as 0.0 / 1.0.
    pub fn as_f32(&self) -> f32 {
        match *self {
            ParamValue::Bool(b) => f32::from(u8::from(b)),
            ParamValue::Int(v) => v as f32,
            ParamValue::Float(v) => v,
        }
    }

    /// Integer view; floats truncate toward zero.
    pub fn as_i32(&self) -> i32 {
        match *self {
            ParamValue::Bool(b) => i32::from(b),
            ParamValue::Int(v) => v,
            ParamValue::Float(v) => v as i32,
        }
    }
}

/// Registered value with its default and flags
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamMetadata {
    pub value: ParamValue,
    pub default: ParamValue,
    pub flags: ParamFlags,
}

impl ParamMetadata {
    /// True when the value was overridden away from its default.
    pub fn is_overridden(&self) -> bool {
        self.value != self.default
    }
}

pub struct ParameterStore {
    entries: FnvIndexMap<Name, ParamMetadata, MAX_PARAMS>,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterStore {
    pub fn new() -> Self {
        Self {
            entries: FnvIndexMap::new(),
        }
    }

    fn name(name: &str) -> Result<Name, ParameterError> {
        Name::try_from(name).map_err(|_| ParameterError::NameTooLong)
    }

    /// Register `name` with its default.
    ///
    /// Registering an existing name keeps its current value and flags, so
    /// blocks can register defaults in any order after overrides were loaded.
    pub fn register(
        &mut self,
        name: &str,
        default: ParamValue,
        flags: ParamFlags,
    ) -> Result<(), ParameterError> {
        let key = Self::name(name)?;
        if self.entries.contains_key(&key) {
            return Ok(());
        }
        self.entries
            .insert(
                key,
                ParamMetadata {
                    value: default,
                    default,
                    flags,
                },
            )
            .map(|_| ())
            .map_err(|_| ParameterError::StoreFull)
    }

    /// Override a registered parameter.
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<(), ParameterError> {
        let entry = self.entry_mut(name)?;
        if entry.flags.contains(ParamFlags::READ_ONLY) {
            return Err(ParameterError::ReadOnly);
        }
        entry.value = value;
        Ok(())
    }

    /// Restore the registered default.
    pub fn reset(&mut self, name: &str) -> Result<(), ParameterError> {
        let entry = self.entry_mut(name)?;
        entry.value = entry.default;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.metadata(name).map(|entry| &entry.value)
    }

    /// Numeric value, or `default` if the parameter is missing.
    pub fn get_f32_or(&self, name: &str, default: f32) -> f32 {
        self.get(name).map_or(default, ParamValue::as_f32)
    }

    /// Integer value, or `default` if the parameter is missing.
    pub fn get_i32_or(&self, name: &str, default: i32) -> i32 {
        self.get(name).map_or(default, ParamValue::as_i32)
    }

    pub fn metadata(&self, name: &str) -> Option<&ParamMetadata> {
        let key = Self::name(name).ok()?;
        self.entries.get(&key)
    }

    /// Names of parameters whose value differs from the default, in
    /// registration order.
    pub fn overridden(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_overridden())
            .map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_mut(&mut self, name: &str) -> Result<&mut ParamMetadata, ParameterError> {
        let key = Self::name(name)?;
        self.entries.get_mut(&key).ok_or(ParameterError::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_then_override() {
        let mut store = ParameterStore::new();
        assert!(store.is_empty());

        store
            .register("SHOT_POWER", ParamValue::Float(0.8), ParamFlags::empty())
            .unwrap();
        assert_eq!(store.get_f32_or("SHOT_POWER", 0.0), 0.8);
        assert_eq!(store.overridden().count(), 0);

        store.set("SHOT_POWER", ParamValue::Float(0.6)).unwrap();
        assert_eq!(store.get("SHOT_POWER"), Some(&ParamValue::Float(0.6)));
        assert!(store.overridden().eq(["SHOT_POWER"]));

        store.reset("SHOT_POWER").unwrap();
        assert_eq!(store.get_f32_or("SHOT_POWER", 0.0), 0.8);
    }

    #[test]
    fn test_missing_parameter_falls_back() {
        let store = ParameterStore::new();
        assert_eq!(store.get_f32_or("FEED_BANK_VEL", 1300.0), 1300.0);
        assert_eq!(store.get_i32_or("AUTO_SHOOT_CNT", 3), 3);
    }

    #[test]
    fn test_set_unknown() {
        let mut store = ParameterStore::new();
        assert_eq!(
            store.set("FEED_BANK_VEL", ParamValue::Int(1)),
            Err(ParameterError::Unknown)
        );
        assert_eq!(store.reset("FEED_BANK_VEL"), Err(ParameterError::Unknown));
    }

    #[test]
    fn test_name_too_long() {
        let mut store = ParameterStore::new();
        assert_eq!(
            store.register(
                "FLYWHEEL_BANK_VELOCITY",
                ParamValue::Int(1),
                ParamFlags::empty()
            ),
            Err(ParameterError::NameTooLong)
        );
    }

    #[test]
    fn test_register_keeps_override() {
        let mut store = ParameterStore::new();
        store
            .register("AUTO_SHOOT_CNT", ParamValue::Int(3), ParamFlags::empty())
            .unwrap();
        store.set("AUTO_SHOOT_CNT", ParamValue::Int(5)).unwrap();
        store
            .register("AUTO_SHOOT_CNT", ParamValue::Int(3), ParamFlags::empty())
            .unwrap();

        assert_eq!(store.get_i32_or("AUTO_SHOOT_CNT", 0), 5);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_full() {
        let mut store = ParameterStore::new();
        let mut name = String::<PARAM_NAME_LEN>::new();
        for i in 0..MAX_PARAMS {
            name.clear();
            core::fmt::write(&mut name, format_args!("P{}", i)).unwrap();
            store
                .register(&name, ParamValue::Int(0), ParamFlags::empty())
                .unwrap();
        }
        assert_eq!(
            store.register("ONE_MORE", ParamValue::Int(0), ParamFlags::empty()),
            Err(ParameterError::StoreFull)
        );
    }

    #[test]
    fn test_read_only() {
        let mut store = ParameterStore::new();
        store
            .register("DRIVE_TICKS_IN", ParamValue::Float(14.86), ParamFlags::READ_ONLY)
            .unwrap();
        assert_eq!(
            store.set("DRIVE_TICKS_IN", ParamValue::Float(10.0)),
            Err(ParameterError::ReadOnly)
        );
        assert!(store
            .metadata("DRIVE_TICKS_IN")
            .is_some_and(|m| m.flags.contains(ParamFlags::READ_ONLY)));
    }

    #[test]
    fn test_param_value_views() {
        assert_eq!(ParamValue::Bool(true).as_f32(), 1.0);
        assert_eq!(ParamValue::Int(1300).as_f32(), 1300.0);
        assert_eq!(ParamValue::Float(2.9).as_i32(), 2);
        assert_eq!(ParamValue::Bool(false).as_i32(), 0);
    }
}
