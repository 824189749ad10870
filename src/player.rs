//! Player-side view of the world: who controls an entity and what they carry.

use strata_blocks::{MaterialId, MaterialRegistry};
use strata_geom::Transform;
use strata_world::World;

/// Stack size for block materials, which carry no limit of their own.
pub const BLOCK_STACK: u16 = 64;

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub name: String,
    pub transform: Transform,
}

impl Player {
    pub fn new(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            transform,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResourcePolicy {
    Finite,
    /// Placing and spending never draws from the inventory.
    Infinite,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ItemStack {
    pub material: MaterialId,
    pub amount: u16,
}

/// Fixed number of slots, each empty or holding one stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerInventory {
    slots: Vec<Option<ItemStack>>,
}

impl PlayerInventory {
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    fn stack_limit(material: MaterialId, registry: &MaterialRegistry) -> u16 {
        match registry.get(material) {
            Some(m) => match m.as_item() {
                Some(item) => item.max_stack,
                None => BLOCK_STACK,
            },
            None => 0,
        }
    }

    /// Adds up to `amount`, topping up existing stacks before opening new
    /// ones. Returns what did not fit.
    pub fn add(&mut self, material: MaterialId, amount: u32, registry: &MaterialRegistry) -> u32 {
        let limit = Self::stack_limit(material, registry);
        if limit == 0 {
            return amount;
        }
        let mut left = amount;
        for stack in self.slots.iter_mut().flatten() {
            if left == 0 {
                break;
            }
            if stack.material == material && stack.amount < limit {
                let take = left.min(u32::from(limit - stack.amount));
                stack.amount += take as u16;
                left -= take;
            }
        }
        for slot in self.slots.iter_mut() {
            if left == 0 {
                break;
            }
            if slot.is_none() {
                let take = left.min(u32::from(limit));
                *slot = Some(ItemStack {
                    material,
                    amount: take as u16,
                });
                left -= take;
            }
        }
        left
    }

    pub fn count(&self, material: MaterialId) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|s| s.material == material)
            .map(|s| u32::from(s.amount))
            .sum()
    }

    /// Removes exactly `amount` or nothing at all.
    pub fn remove(&mut self, material: MaterialId, amount: u32) -> bool {
        if self.count(material) < amount {
            return false;
        }
        let mut left = amount;
        for slot in self.slots.iter_mut().rev() {
            if left == 0 {
                break;
            }
            let Some(stack) = slot else {
                continue;
            };
            if stack.material != material {
                continue;
            }
            let take = left.min(u32::from(stack.amount));
            stack.amount -= take as u16;
            left -= take;
            if stack.amount == 0 {
                *slot = None;
            }
        }
        true
    }
}

/// Binds one [`Player`] to its inventory and resource policy.
#[derive(Debug)]
pub struct PlayerController {
    player: Player,
    inventory: Option<PlayerInventory>,
    policy: ResourcePolicy,
}

impl PlayerController {
    pub fn new(player: Player, policy: ResourcePolicy) -> Self {
        Self {
            player,
            inventory: None,
            policy,
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Creates the inventory on first call; later calls hand back the same one.
    pub fn create_inventory(&mut self, size: usize) -> &mut PlayerInventory {
        if let Some(existing) = &self.inventory {
            if existing.size() != size {
                log::warn!(
                    "{}: inventory already has {} slots, ignoring request for {}",
                    self.player.name,
                    existing.size(),
                    size
                );
            }
        }
        self.inventory.get_or_insert_with(|| PlayerInventory::new(size))
    }

    pub fn inventory(&self) -> Option<&PlayerInventory> {
        self.inventory.as_ref()
    }

    pub fn inventory_mut(&mut self) -> Option<&mut PlayerInventory> {
        self.inventory.as_mut()
    }

    #[inline]
    pub fn has_infinite_resources(&self) -> bool {
        self.policy == ResourcePolicy::Infinite
    }

    /// Spends `amount` of `material`. Infinite controllers always succeed and
    /// never touch the inventory.
    pub fn consume(&mut self, material: MaterialId, amount: u32) -> bool {
        if self.has_infinite_resources() || amount == 0 {
            return true;
        }
        match self.inventory.as_mut() {
            Some(inv) => inv.remove(material, amount),
            None => false,
        }
    }

    /// Moves the player to the world's spawn.
    pub fn spawn_into(&mut self, world: &World) {
        self.player.transform = world.spawn();
        log::debug!(
            "{} spawned at {:?} in world {:?}",
            self.player.name,
            self.player.transform.position.pos,
            world.info().name
        );
    }
}
