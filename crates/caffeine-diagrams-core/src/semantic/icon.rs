//! Icon catalogue for architecture nodes.

use std::fmt;

/// Vendor family an icon belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Aws,
    OnPrem,
    Programming,
    Saas,
    Generic,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aws => "aws",
            Self::OnPrem => "onprem",
            Self::Programming => "programming",
            Self::Saas => "saas",
            Self::Generic => "generic",
        }
    }
}

/// The picture drawn for a node.
///
/// Icons are purely descriptive and carry no behaviour besides their look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    /// AWS Application Load Balancer
    Alb,
    /// AWS Elastic Load Balancer
    Elb,
    /// AWS Elastic Container Service
    Ecs,
    /// AWS Relational Database Service
    Rds,
    Users,
    Server,
    Docker,
    PostgreSql,
    Mlflow,
    FastApi,
    React,
    Slack,
    /// Generic compute rack
    Rack,
}

impl Icon {
    pub const ALL: [Icon; 13] = [
        Icon::Alb,
        Icon::Elb,
        Icon::Ecs,
        Icon::Rds,
        Icon::Users,
        Icon::Server,
        Icon::Docker,
        Icon::PostgreSql,
        Icon::Mlflow,
        Icon::FastApi,
        Icon::React,
        Icon::Slack,
        Icon::Rack,
    ];

    pub fn provider(self) -> Provider {
        match self {
            Self::Alb | Self::Elb | Self::Ecs | Self::Rds => Provider::Aws,
            Self::Users | Self::Server | Self::Docker | Self::PostgreSql | Self::Mlflow => {
                Provider::OnPrem
            }
            Self::FastApi | Self::React => Provider::Programming,
            Self::Slack => Provider::Saas,
            Self::Rack => Provider::Generic,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Alb => "ALB",
            Self::Elb => "ELB",
            Self::Ecs => "ECS",
            Self::Rds => "RDS",
            Self::Users => "Users",
            Self::Server => "Server",
            Self::Docker => "Docker",
            Self::PostgreSql => "PostgreSQL",
            Self::Mlflow => "Mlflow",
            Self::FastApi => "FastAPI",
            Self::React => "React",
            Self::Slack => "Slack",
            Self::Rack => "Rack",
        }
    }

    /// Dominant brand color of the icon, as a CSS hex string
    pub fn accent(self) -> &'static str {
        match self {
            Self::Alb | Self::Elb => "#8C4FFF",
            Self::Ecs => "#ED7100",
            Self::Rds => "#3B48CC",
            Self::Users => "#2D3E50",
            Self::Server => "#4A5568",
            Self::Docker => "#2496ED",
            Self::PostgreSql => "#336791",
            Self::Mlflow => "#0194E2",
            Self::FastApi => "#05998B",
            Self::React => "#61DAFB",
            Self::Slack => "#4A154B",
            Self::Rack => "#7B8894",
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.provider().as_str(), self.name())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::color::Color;

    #[test]
    fn test_every_accent_is_a_valid_color() {
        for icon in Icon::ALL {
            assert!(Color::new(icon.accent()).is_ok(), "{icon} accent invalid");
        }
    }

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = Icon::ALL.iter().map(|icon| icon.name()).collect();
        assert_eq!(names.len(), Icon::ALL.len());
    }

    #[test]
    fn test_display_includes_provider() {
        assert_eq!(Icon::Rds.to_string(), "aws.RDS");
        assert_eq!(Icon::Rack.to_string(), "generic.Rack");
    }
}
