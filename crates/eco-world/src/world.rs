//! Simulation engine: owns every population and drives the per-tick order.

use crate::animal::{reproduce, Animal};
use crate::command::{Command, CommandQueue};
use crate::environment::EnvironmentState;
use crate::plant::{Growth, Patch, Plant};
use crate::population::{Pools, Populations};
use crate::rain::RainField;
use crate::snapshot::{AnimalView, PlantView, WorldSnapshot};
use crate::species::{
    bird_move, carnivore_step, human_hunt, human_move, pack_centroid, regroup, Kill,
    GRAZER_ALERT_RANGE,
};
use crate::zone_map::ZoneMap;
use eco_core::{
    Bounds, Census, EntityId, Position, Precipitation, Result, SimConfig, SpawnKind, Species,
    TickReport, ZoneKind,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, event, info, instrument, Level};

/// Environmental reading for one zone cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LocalConditions {
    pub zone: ZoneKind,
    pub sunlight: f32,
    pub humidity: f32,
    pub precipitation: Precipitation,
}

pub struct World {
    config: SimConfig,
    bounds: Bounds,
    zone_map: ZoneMap,
    populations: Populations,
    plants: Vec<Plant>,
    environment: EnvironmentState,
    rain: RainField,
    commands: CommandQueue,
    rng: ChaCha8Rng,
    tick: u64,
}

impl World {
    /// Generate a fresh zone map from the configured seed
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.run.seed);
        let zone_map = ZoneMap::generate(
            config.world.grid_width,
            config.world.grid_height,
            config.world.smoothing_passes,
            &mut rng,
        )?;
        Ok(Self::assemble(config, zone_map, rng))
    }

    /// Use a prepared zone map instead of generating one
    pub fn with_zone_map(config: SimConfig, zone_map: ZoneMap) -> Result<Self> {
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.run.seed);
        Ok(Self::assemble(config, zone_map, rng))
    }

    fn assemble(config: SimConfig, zone_map: ZoneMap, mut rng: ChaCha8Rng) -> Self {
        let bounds = Bounds::new(config.world.width, config.world.height);
        let rain = RainField::new(config.world.raindrop_count, bounds, &mut rng);
        let environment = EnvironmentState::from_config(&config.environment);

        info!(
            event = "world_created",
            width = bounds.width,
            height = bounds.height,
            grid_width = zone_map.width,
            grid_height = zone_map.height,
            seed = config.run.seed,
            "World created"
        );

        Self {
            config,
            bounds,
            zone_map,
            populations: Populations::default(),
            plants: Vec::new(),
            environment,
            rain,
            commands: CommandQueue::new(),
            rng,
            tick: 0,
        }
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn zone_map(&self) -> &ZoneMap {
        &self.zone_map
    }

    pub fn environment(&self) -> &EnvironmentState {
        &self.environment
    }

    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    pub fn populations(&self) -> &Populations {
        &self.populations
    }

    pub fn population(&self, species: Species) -> &[Animal] {
        self.populations.of(species)
    }

    pub fn population_mut(&mut self, species: Species) -> &mut Vec<Animal> {
        self.populations.of_mut(species)
    }

    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Queue a command for the start of the next tick
    pub fn submit(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Place an entity immediately, clamped into the world
    pub fn spawn(&mut self, kind: SpawnKind, position: Position) -> EntityId {
        let position = self.bounds.clamp(position);
        match kind {
            SpawnKind::Plant => {
                let plant = Plant::new(position, &self.zone_map, self.bounds);
                let id = plant.id;
                debug!(event = "plant_spawned", id = %id, x = position.x, y = position.y, zone = ?plant.zone);
                self.plants.push(plant);
                id
            }
            SpawnKind::Animal(species) => {
                let animal =
                    Animal::new(species, position, &mut self.rng).with_birth_tick(self.tick);
                let id = animal.id;
                debug!(event = "animal_spawned", id = %id, species = %species, x = position.x, y = position.y);
                self.populations.push(animal);
                id
            }
        }
    }

    /// Run `ticks` ticks and return the combined report
    #[instrument(skip(self), fields(start_tick = self.tick))]
    pub fn run(&mut self, ticks: u64) -> TickReport {
        info!("Starting simulation for {} ticks", ticks);
        let interval = self.config.run.metrics_interval;
        let mut total = TickReport::new(self.tick);

        for _ in 0..ticks {
            let report = self.tick();
            total.absorb(&report);

            if interval > 0 && self.tick % interval == 0 {
                self.emit_population_metrics();
            }
        }

        let census = self.census();
        info!(
            event = "run_complete",
            final_tick = self.tick,
            births = total.births,
            starved = total.starved,
            killed = total.killed,
            plants_lost = total.plants_lost,
            survivors = census.total_animals(),
            plants = census.plants,
            "Simulation complete"
        );

        total
    }

    /// Advance one tick in the fixed species order
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::new(self.tick);

        report.commands_applied = self.apply_commands();
        self.advance_plants(&mut report);
        self.advance_carnivores(Species::Predator);
        self.advance_carnivores(Species::Lion);
        self.advance_carnivores(Species::Tiger);
        self.advance_humans();
        self.advance_grazers(Species::Herbivore, &mut report);
        self.advance_grazers(Species::Rabbit, &mut report);
        self.advance_birds(&mut report);

        if self.environment.is_raining() {
            self.rain.advance(self.bounds, &mut self.rng);
        }

        self.remove_dead(&mut report);
        self.tick += 1;
        report
    }

    fn apply_commands(&mut self) -> u32 {
        let commands = self.commands.drain();
        for command in &commands {
            self.apply(*command);
        }
        commands.len() as u32
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Spawn { kind, position } => {
                self.spawn(kind, position);
            }
            Command::AdjustSunlight { delta } => {
                self.environment.adjust_sunlight(delta);
                debug!(event = "sunlight_adjusted", delta, sunlight = self.environment.sunlight);
            }
            Command::AdjustHumidity { delta } => {
                self.environment.adjust_humidity(delta);
                debug!(event = "humidity_adjusted", delta, humidity = self.environment.humidity);
            }
            Command::CycleWeather => {
                self.environment.cycle_weather();
                debug!(event = "weather_changed", weather = ?self.environment.weather);
            }
        }
    }

    fn advance_plants(&mut self, report: &mut TickReport) {
        let anchors: HashSet<Patch> = self
            .plants
            .iter()
            .filter(|p| p.is_alive())
            .map(Plant::anchor)
            .collect();

        for plant in self.plants.iter_mut().filter(|p| p.is_alive()) {
            match plant.grow(
                &self.environment,
                &self.zone_map,
                self.bounds,
                &anchors,
                &mut self.rng,
            ) {
                Growth::Grew(added) => report.patches_grown += added as u32,
                Growth::Died => {
                    debug!(event = "plant_withered", id = %plant.id, tick = self.tick);
                }
                Growth::Capped | Growth::Dormant | Growth::Withered => {}
            }
        }
    }

    fn advance_carnivores(&mut self, species: Species) {
        let mut hunters = std::mem::take(self.populations.of_mut(species));
        let rally = if species == Species::Lion {
            pack_centroid(&hunters)
        } else {
            None
        };

        let populations = &mut self.populations;
        let mut prey = Pools::new(vec![
            populations.herbivores.as_mut_slice(),
            populations.rabbits.as_mut_slice(),
        ]);

        for hunter in hunters.iter_mut().filter(|h| h.is_alive()) {
            if let Some(rally) = rally {
                regroup(hunter, &rally);
            }
            let kills = carnivore_step(
                hunter,
                &mut prey,
                &mut populations.humans,
                self.bounds,
                &mut self.rng,
            );
            log_kills(&kills, self.tick);
        }

        *self.populations.of_mut(species) = hunters;
    }

    fn advance_humans(&mut self) {
        let mut humans = std::mem::take(&mut self.populations.humans);

        let populations = &mut self.populations;
        let mut quarry = Pools::new(vec![
            populations.herbivores.as_mut_slice(),
            populations.rabbits.as_mut_slice(),
            populations.predators.as_mut_slice(),
            populations.lions.as_mut_slice(),
            populations.tigers.as_mut_slice(),
        ]);

        for human in humans.iter_mut().filter(|h| h.is_alive()) {
            human_move(human, self.bounds, &mut self.rng);
            let kills = human_hunt(human, &mut quarry, self.bounds, &mut self.rng);
            log_kills(&kills, self.tick);
        }

        self.populations.humans = humans;
    }

    /// Herbivores and rabbits: move, graze, breed, then shy away from threats
    fn advance_grazers(&mut self, species: Species, report: &mut TickReport) {
        let threats = self.populations.threat_positions();
        let mut herd = std::mem::take(self.populations.of_mut(species));

        // Offspring appended during the pass wait for the next tick
        let count = herd.len();
        for i in 0..count {
            if !herd[i].is_alive() {
                continue;
            }
            herd[i].wander(self.bounds, &mut self.rng);
            self.forage_and_breed(&mut herd, i, report);
            if herd[i].is_alive() {
                herd[i].flee_from(&threats, GRAZER_ALERT_RANGE);
            }
        }

        *self.populations.of_mut(species) = herd;
    }

    fn advance_birds(&mut self, report: &mut TickReport) {
        let threats = self.populations.threat_positions();
        let mut flock = std::mem::take(&mut self.populations.birds);

        let count = flock.len();
        for i in 0..count {
            if !flock[i].is_alive() {
                continue;
            }
            bird_move(&mut flock[i], &threats, self.bounds, &mut self.rng);
            self.forage_and_breed(&mut flock, i, report);
        }

        self.populations.birds = flock;
    }

    fn forage_and_breed(&mut self, group: &mut Vec<Animal>, index: usize, report: &mut TickReport) {
        if !group[index].is_alive() {
            return;
        }
        if let Some(meal) = group[index].eat_plants(&mut self.plants) {
            if meal.plant_died {
                debug!(event = "plant_eaten", id = %meal.plant, by = %group[index].id, tick = self.tick);
            }
        }

        if let Some(child) = reproduce(group, index, self.bounds, self.tick, &mut self.rng) {
            report.births += 1;
            debug!(
                event = "animal_born",
                id = %child,
                species = %group[index].species(),
                parent = %group[index].id,
                tick = self.tick
            );
        }
    }

    /// Compact every collection once all passes are done
    fn remove_dead(&mut self, report: &mut TickReport) {
        for animal in self.populations.compact() {
            let cause = if animal.health <= 0.0 {
                report.killed += 1;
                "killed"
            } else {
                report.starved += 1;
                "starved"
            };
            debug!(
                event = "animal_removed",
                id = %animal.id,
                species = %animal.species(),
                cause,
                age = self.tick.saturating_sub(animal.born_tick),
                tick = self.tick
            );
        }

        let before = self.plants.len();
        self.plants.retain(Plant::is_alive);
        report.plants_lost = (before - self.plants.len()) as u32;
    }

    /// Live members per species plus plant totals
    pub fn census(&self) -> Census {
        let mut census = Census::new();
        for species in Species::all() {
            census
                .animals
                .insert(species, self.populations.live_count(species));
        }
        let live_plants = self.plants.iter().filter(|p| p.is_alive());
        for plant in live_plants {
            census.plants += 1;
            census.plant_patches += plant.patches.len();
        }
        census
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            environment: self.environment,
            grid_width: self.zone_map.width,
            grid_height: self.zone_map.height,
            zone_colors: self.zone_map.colors(),
            plants: self
                .plants
                .iter()
                .filter(|p| p.is_alive())
                .map(PlantView::from)
                .collect(),
            animals: self
                .populations
                .iter()
                .filter(|a| a.is_alive())
                .map(AnimalView::from)
                .collect(),
            raindrops: if self.environment.is_raining() {
                self.rain.drops.clone()
            } else {
                Vec::new()
            },
        }
    }

    /// Fresh environmental reading and weather roll for a zone cell
    pub fn local_conditions(&mut self, x: i64, y: i64) -> Result<LocalConditions> {
        let zone = self.zone_map.get_zone(x, y)?;
        let (sunlight, humidity) = self.zone_map.get_sunlight_and_humidity(x, y, &mut self.rng)?;
        Ok(LocalConditions {
            zone: zone.kind,
            sunlight,
            humidity,
            precipitation: zone.roll_weather(&mut self.rng),
        })
    }

    fn emit_population_metrics(&self) {
        let census = self.census();

        info!(
            event = "population_metrics",
            tick = self.tick,
            herbivores = census.count(Species::Herbivore),
            rabbits = census.count(Species::Rabbit),
            birds = census.count(Species::Bird),
            predators = census.count(Species::Predator),
            lions = census.count(Species::Lion),
            tigers = census.count(Species::Tiger),
            humans = census.count(Species::Human),
            plants = census.plants,
            plant_patches = census.plant_patches,
            sunlight = self.environment.sunlight,
            humidity = self.environment.humidity,
            weather = ?self.environment.weather,
            "Population metrics snapshot"
        );

        event!(
            Level::INFO,
            gauge_name = "population_total",
            gauge_value = census.total_animals(),
            tick = self.tick,
            "Population gauge"
        );
    }
}

fn log_kills(kills: &[Kill], tick: u64) {
    for kill in kills {
        debug!(
            event = "kill",
            hunter = %kill.hunter,
            hunter_species = %kill.hunter_species,
            prey = %kill.prey,
            prey_species = %kill.prey_species,
            tick
        );
    }
}
