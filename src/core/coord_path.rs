//! Koordinatenpfade: Adressierung einer einzelnen Position innerhalb einer Geometrie.
//!
//! Format: punktgetrennte Indizes, z.B. `3` (LineString), `0.3` (Polygon: Ring 0,
//! Position 3) oder `1.0.2` (MultiPolygon: Teil 1, Ring 0, Position 2).
//! Pfade ordnen sich numerisch, Komponente für Komponente (`0.10` > `0.9`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fehler beim Parsen eines Koordinatenpfads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Ungültiger Koordinatenpfad: '{0}'")]
pub struct ParseCoordPathError(pub String);

/// Adresse einer Position innerhalb einer Geometrie.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CoordPath(Vec<usize>);

impl CoordPath {
    /// Erstellt einen Pfad aus den Einzelindizes.
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// Einzelindizes des Pfads (äußerster zuerst).
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Anzahl der Komponenten.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` für den leeren Pfad.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Erster Index und Restpfad, z.B. `1.0.2` → `(1, 0.2)`.
    pub fn split_first(&self) -> Option<(usize, CoordPath)> {
        let (first, rest) = self.0.split_first()?;
        Some((*first, CoordPath(rest.to_vec())))
    }

    /// Neuer Pfad mit `index` als vorangestellter Komponente.
    pub fn prefixed(&self, index: usize) -> CoordPath {
        let mut indices = Vec::with_capacity(self.0.len() + 1);
        indices.push(index);
        indices.extend_from_slice(&self.0);
        CoordPath(indices)
    }

    /// Neuer Pfad mit `index` als angehängter Komponente.
    pub fn child(&self, index: usize) -> CoordPath {
        let mut indices = self.0.clone();
        indices.push(index);
        CoordPath(indices)
    }
}

impl fmt::Display for CoordPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

impl FromStr for CoordPath {
    type Err = ParseCoordPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(CoordPath::default());
        }
        trimmed
            .split('.')
            .map(|part| part.parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map(CoordPath)
            .map_err(|_| ParseCoordPathError(s.to_string()))
    }
}

impl TryFrom<String> for CoordPath {
    type Error = ParseCoordPathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CoordPath> for String {
    fn from(path: CoordPath) -> Self {
        path.to_string()
    }
}

impl From<Vec<usize>> for CoordPath {
    fn from(indices: Vec<usize>) -> Self {
        CoordPath(indices)
    }
}
