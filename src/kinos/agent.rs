//! Agent reference: the (blueprint, kin) pair scoping every API call.

/// Identifies one conversational agent under a blueprint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentRef {
    pub blueprint_id: String,
    pub kin_id: String,
}

impl AgentRef {
    pub fn new(blueprint_id: impl Into<String>, kin_id: impl Into<String>) -> Self {
        Self {
            blueprint_id: blueprint_id.into(),
            kin_id: kin_id.into(),
        }
    }

    /// The fixed Simba persona used by every command.
    pub fn simba() -> Self {
        Self::new("simba", "simba")
    }

    pub fn messages_path(&self) -> String {
        format!(
            "/v2/blueprints/{}/kins/{}/messages",
            self.blueprint_id, self.kin_id
        )
    }

    pub fn analysis_path(&self) -> String {
        format!(
            "/v2/blueprints/{}/kins/{}/analysis",
            self.blueprint_id, self.kin_id
        )
    }

    pub fn autonomous_thinking_path(&self) -> String {
        format!(
            "/v2/blueprints/{}/kins/{}/autonomous_thinking",
            self.blueprint_id, self.kin_id
        )
    }

    pub fn images_path(&self) -> String {
        format!(
            "/v2/blueprints/{}/kins/{}/images",
            self.blueprint_id, self.kin_id
        )
    }

    /// Kin creation is scoped to the blueprint only.
    pub fn kins_path(&self) -> String {
        format!("/v2/blueprints/{}/kins", self.blueprint_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_paths() {
        let agent = AgentRef::simba();
        assert_eq!(agent.messages_path(), "/v2/blueprints/simba/kins/simba/messages");
        assert_eq!(agent.kins_path(), "/v2/blueprints/simba/kins");
        assert_eq!(
            agent.autonomous_thinking_path(),
            "/v2/blueprints/simba/kins/simba/autonomous_thinking"
        );
    }
}
