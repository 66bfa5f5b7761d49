use snafu::Snafu;

/// Misconfigurations that are detected on initialization.
///
/// None of these abort the simulation. Each one is logged and auto-corrected
/// to the nearest safe default.
#[derive(Debug, Snafu, Clone, PartialEq)]
#[snafu(context(suffix(Err)), visibility(pub(crate)))]
pub enum RopeError {
    #[snafu(display("VerletRope: No anchor points assigned - assigned as self"))]
    NoAnchors,

    #[snafu(display("VerletRope: 'Point A' undefined - replaced with value from 'Point B'"))]
    MissingPointA,

    #[snafu(display("VerletRope: 'Lock Point B' disabled, as 'Point B' is undefined"))]
    LockedPointBUnassigned,

    #[snafu(display("VerletRope: No node shape defined - disabled collision checking"))]
    NoNodeShape,

    #[snafu(display("VerletRope: Node count {count} is below 2 - clamped to 2"))]
    TooFewNodes { count: usize },

    #[snafu(display("VerletRope: Rope sides {sides} out of range - clamped to {clamped}"))]
    RopeSidesOutOfRange { sides: u32, clamped: u32 },

    #[snafu(display("VerletRope: Anchor transform no longer exists"))]
    AnchorVanished,
}
