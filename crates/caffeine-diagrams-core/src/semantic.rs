//! Semantic model of an architecture diagram.
//!
//! A [`Diagram`] is a small directed graph: labeled [`Node`]s drawn as icons,
//! optionally grouped into (possibly nested) [`Cluster`]s, and joined by
//! directed, optionally labeled [`Edge`]s. Diagrams are normally declared with
//! [`Diagram::build`] and a [`ScopeBuilder`].

mod builder;
mod diagram;
mod icon;

pub use builder::ScopeBuilder;
pub use diagram::{Cluster, ClusterId, Diagram, DiagramError, Edge, EdgeId, Node, NodeId};
pub use icon::{Icon, Provider};

use std::{fmt, str::FromStr};

use serde::Deserialize;

/// Direction in which ranks of a diagram advance.
///
/// The default is [`Direction::LeftRight`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum Direction {
    #[serde(rename = "TB")]
    TopBottom,
    #[serde(rename = "BT")]
    BottomTop,
    #[default]
    #[serde(rename = "LR")]
    LeftRight,
    #[serde(rename = "RL")]
    RightLeft,
}

impl Direction {
    /// Returns the two-letter Graphviz `rankdir` spelling
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopBottom => "TB",
            Self::BottomTop => "BT",
            Self::LeftRight => "LR",
            Self::RightLeft => "RL",
        }
    }

    /// True when ranks advance along the x axis
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftRight | Self::RightLeft)
    }

    /// True when ranks advance towards smaller coordinates
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::BottomTop | Self::RightLeft)
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TB" => Ok(Self::TopBottom),
            "BT" => Ok(Self::BottomTop),
            "LR" => Ok(Self::LeftRight),
            "RL" => Ok(Self::RightLeft),
            _ => Err(format!(
                "invalid direction `{s}`, valid values: TB, BT, LR, RL"
            )),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Available layout engines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutEngine {
    /// Longest-path layering with barycenter ordering
    #[default]
    Basic,
    /// Layering and ordering computed by the rust-sugiyama crate
    Sugiyama,
    /// Delegates layout and rendering to the Graphviz `dot` executable
    #[cfg(feature = "graphviz")]
    Graphviz,
}

impl LayoutEngine {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Sugiyama => "sugiyama",
            #[cfg(feature = "graphviz")]
            Self::Graphviz => "graphviz",
        }
    }
}

impl FromStr for LayoutEngine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Self::Basic),
            "sugiyama" => Ok(Self::Sugiyama),
            #[cfg(feature = "graphviz")]
            "graphviz" => Ok(Self::Graphviz),
            _ => Err(format!("invalid layout engine `{s}`")),
        }
    }
}

impl fmt::Display for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
