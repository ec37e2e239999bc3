use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Move {
    // Normal Type
    Splash,
    Tackle,
    QuickAttack,
    ExtremeSpeed,
    BodySlam,
    RevelationDance,
    // Fighting Type
    DoubleKick,
    // Fire Type
    Ember,
    WillOWisp,
    // Water Type
    WaterGun,
    Soak,
    // Electric Type
    Thunderbolt,
    ThunderWave,
    // Ice Type
    IceBeam,
    FreezeDry,
    // Ground Type
    Earthquake,
    ThousandArrows,
    // Ghost Type
    ShadowBall,
}
