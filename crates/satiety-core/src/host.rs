//! Host Interface
//!
//! Everything the engine needs to know about the running simulation comes
//! through [`Host`]. Every query is optional: `None` means the host cannot
//! answer right now, and the engine falls back to a neutral reading.
//! Implementations must answer without blocking.

use satiety_signals::{
    AgentId, BlockPos, CalendarSample, HazardSample, Material, MaterialLayer, MountInfo,
    MovementState, Position, ToolCategory, TriggerControls,
};

/// Read-only view of the host simulation.
pub trait Host {
    /// Agents currently connected, in any order.
    fn online_agents(&self) -> Vec<AgentId>;

    /// Tool category of the item in the agent's active hand.
    fn active_tool(&self, agent: AgentId) -> Option<ToolCategory>;

    /// Item code in the agent's active hand, e.g. "game:pan-wooden".
    fn held_item_code(&self, agent: AgentId) -> Option<String>;

    /// Seat the agent occupies. `None` is read as "not mounted".
    fn mount_info(&self, agent: AgentId) -> Option<MountInfo>;

    /// Movement flags. `None` is read as "all flags off".
    fn movement_state(&self, agent: AgentId) -> Option<MovementState>;

    /// Primary and secondary control state.
    fn trigger_controls(&self, agent: AgentId) -> Option<TriggerControls>;

    /// Code of the block the agent is looking at, if any.
    fn targeted_block(&self, _agent: AgentId) -> Option<String> {
        None
    }

    /// Position of the agent's feet.
    fn position(&self, agent: AgentId) -> Option<Position>;

    /// Material occupying `layer` at `pos`.
    fn material_at(&self, pos: BlockPos, layer: MaterialLayer) -> Option<Material>;

    /// Current calendar reading.
    fn calendar_sample(&self) -> Option<CalendarSample>;

    /// Current storm reading. Hosts without a storm source keep the default.
    fn hazard_sample(&self) -> Option<HazardSample> {
        None
    }
}

impl<H: Host + ?Sized> Host for &H {
    fn online_agents(&self) -> Vec<AgentId> {
        (**self).online_agents()
    }

    fn active_tool(&self, agent: AgentId) -> Option<ToolCategory> {
        (**self).active_tool(agent)
    }

    fn held_item_code(&self, agent: AgentId) -> Option<String> {
        (**self).held_item_code(agent)
    }

    fn mount_info(&self, agent: AgentId) -> Option<MountInfo> {
        (**self).mount_info(agent)
    }

    fn movement_state(&self, agent: AgentId) -> Option<MovementState> {
        (**self).movement_state(agent)
    }

    fn trigger_controls(&self, agent: AgentId) -> Option<TriggerControls> {
        (**self).trigger_controls(agent)
    }

    fn targeted_block(&self, agent: AgentId) -> Option<String> {
        (**self).targeted_block(agent)
    }

    fn position(&self, agent: AgentId) -> Option<Position> {
        (**self).position(agent)
    }

    fn material_at(&self, pos: BlockPos, layer: MaterialLayer) -> Option<Material> {
        (**self).material_at(pos, layer)
    }

    fn calendar_sample(&self) -> Option<CalendarSample> {
        (**self).calendar_sample()
    }

    fn hazard_sample(&self) -> Option<HazardSample> {
        (**self).hazard_sample()
    }
}

/// The per-agent readings one classification needs, gathered up front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentSignals {
    pub mount: Option<MountInfo>,
    pub movement: MovementState,
    /// Water or seawater at the feet or one block below, on the fluid layer
    pub water_at_feet: bool,
    /// Something solid directly beneath the feet
    pub solid_footing: bool,
    /// Material one block below the feet, falling back to the feet block
    pub ground: Option<Material>,
}

impl AgentSignals {
    /// Queries the host for everything the classifier and composer use.
    pub fn gather<H: Host + ?Sized>(host: &H, agent: AgentId) -> Self {
        let mount = host.mount_info(agent).filter(|m| m.mounted);
        let movement = host.movement_state(agent).unwrap_or_default();

        let Some(feet) = host.position(agent).map(|p| p.block()) else {
            return Self {
                mount,
                movement,
                ..Self::default()
            };
        };

        let water_at_feet = is_water_at(host, feet) || is_water_at(host, feet.below());
        let solid_footing = host
            .material_at(feet.below(), MaterialLayer::Solid)
            .map(|m| m.supports_standing())
            .unwrap_or(false);
        let ground = host
            .material_at(feet.below(), MaterialLayer::Default)
            .or_else(|| host.material_at(feet, MaterialLayer::Default));

        Self {
            mount,
            movement,
            water_at_feet,
            solid_footing,
            ground,
        }
    }
}

fn is_water_at<H: Host + ?Sized>(host: &H, pos: BlockPos) -> bool {
    host.material_at(pos, MaterialLayer::Fluid)
        .map(|m| m.is_liquid && is_water_like(&m.code))
        .unwrap_or(false)
}

/// Water and seawater qualify. Codes mentioning wattle never do.
pub fn is_water_like(code: &str) -> bool {
    let code = code.to_lowercase();
    code.contains("seawater") || (code.contains("water") && !code.contains("wattle"))
}
