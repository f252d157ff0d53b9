// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Plan-based feature entitlements.

use crate::config::SessionConfig;
use crate::ui::toolbar::ToolId;
use serde::{Deserialize, Serialize};

/// Answers what the signed-in user may do.
pub trait Entitlements: Send + Sync {
    fn has_access(&self, tool: ToolId) -> bool;
    /// `exports_this_month` is the count already used.
    fn can_export(&self, exports_this_month: u32) -> bool;
    fn can_create_project(&self, existing_projects: u32) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Pro,
}

/// Entitlements derived from the user's plan.
#[derive(Debug, Clone)]
pub struct PlanEntitlements {
    plan: Plan,
    signed_in: bool,
    project_limit: u32,
    export_limit: u32,
}

impl PlanEntitlements {
    pub fn new(plan: Plan, config: &SessionConfig) -> Self {
        Self {
            plan,
            signed_in: true,
            project_limit: config.free_project_limit,
            export_limit: config.free_export_limit,
        }
    }

    /// No user: every check fails.
    pub fn signed_out() -> Self {
        Self {
            plan: Plan::Free,
            signed_in: false,
            project_limit: 0,
            export_limit: 0,
        }
    }

    pub fn pro() -> Self {
        Self::new(Plan::Pro, &SessionConfig::default())
    }

    pub fn plan(&self) -> Plan {
        self.plan
    }
}

impl Entitlements for PlanEntitlements {
    fn has_access(&self, tool: ToolId) -> bool {
        if !self.signed_in {
            return false;
        }
        self.plan == Plan::Pro || !tool.pro_only()
    }

    fn can_export(&self, exports_this_month: u32) -> bool {
        if !self.signed_in {
            return false;
        }
        self.plan == Plan::Pro || exports_this_month < self.export_limit
    }

    fn can_create_project(&self, existing_projects: u32) -> bool {
        if !self.signed_in {
            return false;
        }
        self.plan == Plan::Pro || existing_projects < self.project_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_plan_limits() {
        let free = PlanEntitlements::new(Plan::Free, &SessionConfig::default());
        assert!(free.has_access(ToolId::Crop));
        assert!(!free.has_access(ToolId::AiEdit));
        assert!(free.can_export(19));
        assert!(!free.can_export(20));
        assert!(free.can_create_project(2));
        assert!(!free.can_create_project(3));
    }

    #[test]
    fn test_pro_plan_is_unlimited() {
        let pro = PlanEntitlements::pro();
        assert!(ToolId::ALL.iter().all(|t| pro.has_access(*t)));
        assert!(pro.can_export(10_000));
        assert!(pro.can_create_project(500));
    }

    #[test]
    fn test_signed_out_gets_nothing() {
        let nobody = PlanEntitlements::signed_out();
        assert!(!nobody.has_access(ToolId::Resize));
        assert!(!nobody.can_export(0));
        assert!(!nobody.can_create_project(0));
    }
}
