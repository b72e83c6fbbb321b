//! Workflow targets chosen by the decision rules.

/// Workflow position a story can be moved to by pull request activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetState {
    /// Code is ready for feature QA.
    ReadyFeatureQa,
    /// QA passed; waiting on engineering review.
    ReadyCodeReview,
    /// QA and engineering review both approved.
    ReadyStaging,
    /// QA requested changes.
    TestFail,
}

impl TargetState {
    /// Returns the configuration key for this target.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReadyFeatureQa => "READY_FEATURE_QA",
            Self::ReadyCodeReview => "READY_CODE_REVIEW",
            Self::ReadyStaging => "READY_STAGING",
            Self::TestFail => "TEST_FAIL",
        }
    }
}

/// Tracker workflow-state names for each [`TargetState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowStateNames {
    /// Name used for [`TargetState::ReadyFeatureQa`].
    pub ready_feature_qa: String,
    /// Name used for [`TargetState::ReadyCodeReview`].
    pub ready_code_review: String,
    /// Name used for [`TargetState::ReadyStaging`].
    pub ready_staging: String,
    /// Name used for [`TargetState::TestFail`].
    pub test_fail: String,
}

impl WorkflowStateNames {
    /// Returns the workflow-state name configured for `target`.
    #[must_use]
    pub fn name_for(&self, target: TargetState) -> &str {
        match target {
            TargetState::ReadyFeatureQa => &self.ready_feature_qa,
            TargetState::ReadyCodeReview => &self.ready_code_review,
            TargetState::ReadyStaging => &self.ready_staging,
            TargetState::TestFail => &self.test_fail,
        }
    }
}

impl Default for WorkflowStateNames {
    fn default() -> Self {
        Self {
            ready_feature_qa: "Ready for Feature QA".to_owned(),
            ready_code_review: "Ready for Code Review".to_owned(),
            ready_staging: "Ready for Staging".to_owned(),
            test_fail: "Test Fail".to_owned(),
        }
    }
}
