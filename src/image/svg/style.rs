//! Inline `style` attribute editing.

use std::fmt;

/// Ordered `property:value` list of a `style` attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineStyle {
    properties: Vec<(String, String)>,
}

impl InlineStyle {
    /// Parse `fill:#000;stroke:none`. Empty and malformed entries are skipped.
    pub fn parse(style: &str) -> Self {
        let properties = style
            .split(';')
            .filter_map(|entry| {
                let (name, value) = entry.split_once(':')?;
                let name = name.trim();
                (!name.is_empty()).then(|| (name.to_string(), value.trim().to_string()))
            })
            .collect();
        Self { properties }
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Replace a property in place, or append it.
    pub fn set(&mut self, name: &str, value: impl fmt::Display) {
        let value = value.to_string();
        match self.properties.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => *slot = value,
            None => self.properties.push((name.to_string(), value)),
        }
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: &str, value: impl fmt::Display) -> Self {
        self.set(name, value);
        self
    }

    /// Drop every `name:value` pair with exactly this value.
    pub fn remove_value(&mut self, name: &str, value: &str) {
        self.properties
            .retain(|(key, current)| !(key == name && current == value));
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (name, value)) in self.properties.iter().enumerate() {
            if index > 0 {
                f.write_str(";")?;
            }
            write!(f, "{name}:{value}")?;
        }
        Ok(())
    }
}
