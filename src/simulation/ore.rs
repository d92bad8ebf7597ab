//! The ore preparation chain from run-of-mine ore to DR-grade pellets and lump.
//!
//! Tonnages are back-calculated from the DRI requirement by inverting the mass loss at each stage,
//! then multiplied by per-stage energy intensities.
use crate::model::constants::OreConstants;
use crate::units::{Dimensionless, Energy, EnergyPerTonne, Tonnes};
use anyhow::{Result, ensure};

/// MJ per MWh
const MJ_PER_MWH: f64 = 3600.0;

/// Annual electricity use of each ore preparation stage
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OreEnergy {
    /// Drilling, loading and hauling
    pub mining: Energy,
    /// Crushing and screening
    pub crushing: Energy,
    /// Grinding ahead of beneficiation
    pub comminution: Energy,
    /// Magnetic concentration
    pub concentration: Energy,
    /// Pelletising
    pub pelletising: Energy,
    /// Stacking and reclaiming of pellets and lump
    pub stacking: Energy,
}

impl OreEnergy {
    /// Total ore preparation electricity
    pub fn total(&self) -> Energy {
        self.mining
            + self.crushing
            + self.comminution
            + self.concentration
            + self.pelletising
            + self.stacking
    }
}

/// Annual mass flows through the ore preparation chain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OreChain {
    /// DR-grade ore charged to the shaft
    pub dr_ore: Tonnes,
    /// Lump ore share of the DR-grade ore
    pub lump: Tonnes,
    /// Pellet share of the DR-grade ore
    pub pellets: Tonnes,
    /// Concentrate fines fed to the pellet plant
    pub pellet_fines: Tonnes,
    /// Crushed ore fed to beneficiation
    pub beneficiation_feed: Tonnes,
    /// Output of crushing and screening
    pub crushed: Tonnes,
    /// Run-of-mine ore
    pub rom: Tonnes,
    /// Grade uplift achieved by concentration (fraction Fe)
    pub grade_uplift: Dimensionless,
    /// Mass lost in concentration
    pub concentration_loss: Dimensionless,
    /// Electricity use by stage
    pub energy: OreEnergy,
}

impl OreChain {
    /// Work back from the DRI requirement to run-of-mine ore.
    ///
    /// # Arguments
    ///
    /// * `dri` - DRI required over the horizon
    /// * `rom_grade` - Fe grade of run-of-mine ore
    /// * `constants` - Ore preparation coefficients
    pub fn calculate(
        dri: Tonnes,
        rom_grade: Dimensionless,
        constants: &OreConstants,
    ) -> Result<Self> {
        let dr_ore = dri * Dimensionless(constants.ore_per_dri);

        let lump_share = if rom_grade.0 >= constants.lump_grade_threshold {
            constants.lump_share
        } else {
            0.0
        };
        let lump = dr_ore * Dimensionless(lump_share);
        let pellets = dr_ore - lump;

        let required_uplift = if rom_grade.0 < constants.lump_grade_threshold {
            constants.dr_grade_floor - rom_grade.0
        } else {
            constants.min_grade_uplift
        };
        let grade_uplift = (required_uplift - constants.min_grade_uplift).max(0.0);
        let concentration_loss = constants.concentration_loss_per_pct * grade_uplift * 100.0;
        ensure!(
            concentration_loss < 1.0,
            "ROM ore grade {} is too low: concentration would lose {:.0}% of the feed",
            rom_grade.0,
            concentration_loss * 100.0
        );

        let pellet_fines = pellets / Dimensionless(1.0 - constants.pelletising_loss);
        let beneficiation_feed = pellet_fines / Dimensionless(1.0 - concentration_loss);
        let crushed = beneficiation_feed + lump;
        let rom = crushed / Dimensionless(1.0 - constants.crushing_loss);

        let mining_intensity =
            (constants.drilling_energy + constants.loading_energy) / MJ_PER_MWH;
        let energy = OreEnergy {
            mining: EnergyPerTonne(mining_intensity) * crushed,
            crushing: EnergyPerTonne(constants.crushing_energy) * crushed,
            comminution: EnergyPerTonne(constants.comminution_energy) * beneficiation_feed,
            concentration: EnergyPerTonne(constants.concentration_energy * grade_uplift * 100.0)
                * beneficiation_feed,
            pelletising: EnergyPerTonne(constants.pelletising_energy) * pellet_fines,
            stacking: EnergyPerTonne(constants.stacking_energy) * (pellets + lump),
        };

        Ok(Self {
            dr_ore,
            lump,
            pellets,
            pellet_fines,
            beneficiation_feed,
            crushed,
            rom,
            grade_uplift: Dimensionless(grade_uplift),
            concentration_loss: Dimensionless(concentration_loss),
            energy,
        })
    }
}
