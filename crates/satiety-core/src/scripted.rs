//! In-memory host for tests, scenario replay and soak runs.

use std::collections::{BTreeMap, HashMap};

use satiety_signals::{
    AgentId, BlockPos, CalendarSample, HazardSample, Material, MaterialLayer, MountInfo,
    MovementState, Position, ToolCategory, TriggerControls,
};

use crate::host::Host;

#[derive(Debug, Clone, Default)]
struct AgentRecord {
    tool: Option<ToolCategory>,
    item_code: Option<String>,
    mount: Option<MountInfo>,
    movement: MovementState,
    controls: TriggerControls,
    position: Option<Position>,
    targeted_block: Option<String>,
}

/// A [`Host`] whose every answer is set by hand.
///
/// Setters on an agent that was never added add it first. Agents come back
/// from [`Host::online_agents`] in id order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedHost {
    agents: BTreeMap<AgentId, AgentRecord>,
    materials: HashMap<(BlockPos, MaterialLayer), Material>,
    calendar: Option<CalendarSample>,
    hazard: Option<HazardSample>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, agent: AgentId) -> &mut AgentRecord {
        self.agents.entry(agent).or_default()
    }

    /// Connects an idle agent with both controls released.
    pub fn add_agent(&mut self, agent: AgentId) {
        self.record(agent);
    }

    pub fn remove_agent(&mut self, agent: AgentId) -> bool {
        self.agents.remove(&agent).is_some()
    }

    pub fn is_online(&self, agent: AgentId) -> bool {
        self.agents.contains_key(&agent)
    }

    pub fn set_position(&mut self, agent: AgentId, position: Position) {
        self.record(agent).position = Some(position);
    }

    pub fn clear_position(&mut self, agent: AgentId) {
        self.record(agent).position = None;
    }

    pub fn set_movement(&mut self, agent: AgentId, movement: MovementState) {
        self.record(agent).movement = movement;
    }

    pub fn set_held_item(&mut self, agent: AgentId, tool: Option<ToolCategory>, item_code: Option<&str>) {
        let record = self.record(agent);
        record.tool = tool;
        record.item_code = item_code.map(str::to_string);
    }

    pub fn set_mount(&mut self, agent: AgentId, mount: Option<MountInfo>) {
        self.record(agent).mount = mount;
    }

    pub fn set_controls(&mut self, agent: AgentId, controls: TriggerControls) {
        self.record(agent).controls = controls;
    }

    pub fn set_targeted_block(&mut self, agent: AgentId, code: Option<&str>) {
        self.record(agent).targeted_block = code.map(str::to_string);
    }

    pub fn set_material(&mut self, pos: BlockPos, layer: MaterialLayer, material: Material) {
        self.materials.insert((pos, layer), material);
    }

    pub fn clear_material(&mut self, pos: BlockPos, layer: MaterialLayer) {
        self.materials.remove(&(pos, layer));
    }

    pub fn clear_materials(&mut self) {
        self.materials.clear();
    }

    pub fn set_calendar(&mut self, calendar: Option<CalendarSample>) {
        self.calendar = calendar;
    }

    pub fn set_hazard(&mut self, hazard: Option<HazardSample>) {
        self.hazard = hazard;
    }
}

impl Host for ScriptedHost {
    fn online_agents(&self) -> Vec<AgentId> {
        self.agents.keys().copied().collect()
    }

    fn active_tool(&self, agent: AgentId) -> Option<ToolCategory> {
        self.agents.get(&agent).and_then(|r| r.tool)
    }

    fn held_item_code(&self, agent: AgentId) -> Option<String> {
        self.agents.get(&agent).and_then(|r| r.item_code.clone())
    }

    fn mount_info(&self, agent: AgentId) -> Option<MountInfo> {
        self.agents.get(&agent).and_then(|r| r.mount.clone())
    }

    fn movement_state(&self, agent: AgentId) -> Option<MovementState> {
        self.agents.get(&agent).map(|r| r.movement)
    }

    fn trigger_controls(&self, agent: AgentId) -> Option<TriggerControls> {
        self.agents.get(&agent).map(|r| r.controls)
    }

    fn targeted_block(&self, agent: AgentId) -> Option<String> {
        self.agents.get(&agent).and_then(|r| r.targeted_block.clone())
    }

    fn position(&self, agent: AgentId) -> Option<Position> {
        self.agents.get(&agent).and_then(|r| r.position)
    }

    fn material_at(&self, pos: BlockPos, layer: MaterialLayer) -> Option<Material> {
        self.materials.get(&(pos, layer)).cloned()
    }

    fn calendar_sample(&self) -> Option<CalendarSample> {
        self.calendar
    }

    fn hazard_sample(&self) -> Option<HazardSample> {
        self.hazard
    }
}
