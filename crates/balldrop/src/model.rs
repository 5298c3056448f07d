//! Requests handed to the CAE host.
//!
//! A [`ModelPlan`] describes the whole explicit-dynamics model: both track
//! shells, the ball, material, mesh seeds, contact, boundary conditions,
//! rigid-body ties, the drop step, output requests and the job. The host reproduces it verbatim,
//! so every number in it comes from [`RunConfig`].

use droptrack::TrackOutline;
use serde::{Deserialize, Serialize};

use crate::config::RunConfig;

/// Part name of the spline track.
pub const TRACK_PART: &str = "Track";

/// Part name of the cycloid track.
pub const CYCLOID_PART: &str = "Track_Cycloid";

/// Part name of the ball.
pub const BALL_PART: &str = "Ball";

/// Reference point set at the ball center.
pub const BALL_CENTER: &str = "Ball_Center";

/// Cell set covering the whole ball solid.
pub const BALL_BODY_SET: &str = "Set-1";

/// Edge of a track shell whose midpoint carries the reference point.
pub const TRACK_RP_EDGE: usize = 3;

/// Displacement component tracked in the history output.
pub const HISTORY_VARIABLE: &str = "U1";

/// Complete model description for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPlan {
    /// Run index.
    pub run: u32,
    /// Parts to create.
    pub parts: Vec<PartSpec>,
    /// Ball material.
    pub material: MaterialSpec,
    /// Assembly instances.
    pub instances: Vec<InstanceSpec>,
    /// Mesh seeds per part.
    pub mesh: Vec<MeshSeed>,
    /// General contact definition.
    pub contact: ContactSpec,
    /// Boundary conditions.
    pub boundary_conditions: Vec<BoundaryCondition>,
    /// Rigid-body ties between each ball and its center reference point.
    pub constraints: Vec<RigidBodySpec>,
    /// Explicit dynamics step.
    pub step: StepSpec,
    /// Gravity vector in mm/s².
    pub gravity: [f64; 3],
    /// Field and history output requests.
    pub outputs: OutputSpec,
    /// Job to write and submit.
    pub job: JobSpec,
}

/// One part of the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PartSpec {
    /// Discrete rigid shell extruded from a sketch outline.
    RigidShell {
        /// Part name.
        name: String,
        /// Sketch outline.
        outline: TrackOutline,
        /// Extrusion depth.
        extrude_depth: f64,
        /// Where the host places the reference point.
        reference_point: ReferencePlacement,
    },
    /// Deformable solid of revolution.
    RevolvedSolid {
        /// Part name.
        name: String,
        /// Sphere radius.
        radius: f64,
        /// Reference point set at the center.
        reference_point: String,
        /// Section assigned to the solid.
        section: String,
        /// Cell set covering the solid, tied to the reference point.
        body_set: String,
    },
}

/// Reference point location on a rigid shell, resolved by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ReferencePlacement {
    /// Midpoint of the part edge with this index.
    EdgeMidpoint {
        /// Host edge index.
        edge: usize,
    },
}

impl PartSpec {
    /// Part name.
    pub fn name(&self) -> &str {
        match self {
            Self::RigidShell { name, .. } | Self::RevolvedSolid { name, .. } => name,
        }
    }
}

/// Elastic material with density.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSpec {
    /// Material name.
    pub name: String,
    /// Density.
    pub density: f64,
    /// Young's modulus.
    pub youngs_modulus: f64,
    /// Poisson's ratio.
    pub poisson_ratio: f64,
}

/// An instance of a part in the assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceSpec {
    /// Instance name, `<part>-<n>`.
    pub name: String,
    /// Instanced part.
    pub part: String,
    /// Translation applied after instancing.
    pub translation: [f64; 3],
}

/// Mesh element family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementShape {
    /// Tetrahedral free mesh.
    Tet,
    /// Default shell mesh.
    Shell,
}

/// Mesh seed for one part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshSeed {
    /// Seeded part.
    pub part: String,
    /// Seed size.
    pub size: f64,
    /// Element family.
    pub shape: ElementShape,
    /// Curvature deviation factor.
    pub deviation_factor: f64,
    /// Minimum size factor.
    pub min_size_factor: f64,
}

/// General contact between every surface pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSpec {
    /// Interaction property name.
    pub property: String,
    /// Tangential friction coefficient (0 for frictionless).
    pub friction: f64,
    /// Penalty elastic slip fraction.
    pub elastic_slip_fraction: f64,
    /// Hard normal contact.
    pub hard_normal: bool,
    /// Allow separation after contact.
    pub allow_separation: bool,
}

/// A boundary condition applied in the initial step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoundaryCondition {
    /// Fixes U3, UR1 and UR2 so the ball moves in its plane.
    InPlane {
        /// Condition name.
        name: String,
        /// Region set.
        region: String,
    },
    /// Fixes every degree of freedom.
    Encastre {
        /// Condition name.
        name: String,
        /// Region set.
        region: String,
    },
}

/// Ties a body region rigidly to a reference point region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigidBodySpec {
    /// Constraint name.
    pub name: String,
    /// Assembly set holding the reference point.
    pub ref_point_region: String,
    /// Instance set holding the body cells, `<instance>.<set>`.
    pub body_region: String,
}

/// Explicit dynamics step with a fixed increment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSpec {
    /// Step name.
    pub name: String,
    /// Step duration.
    pub period: f64,
    /// Fixed time increment.
    pub increment: f64,
}

/// Output requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpec {
    /// Field output variables.
    pub field_variables: Vec<String>,
    /// Field output intervals over the step.
    pub field_intervals: u32,
    /// History output variable.
    pub history_variable: String,
    /// History output region.
    pub history_region: String,
    /// History output frequency in increments.
    pub history_frequency: u32,
}

/// Solver job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Job name.
    pub name: String,
    /// Input file written before submission.
    pub input_file: String,
    /// CPUs requested.
    pub cpus: u32,
}

/// Set name of the reference point on a ball instance.
pub fn ball_center_set(instance: usize) -> String {
    format!("{BALL_CENTER}_RP_{instance}")
}

/// Set name of the reference point on a track part.
pub fn track_rp_set(part: &str) -> String {
    format!("{part}_RP")
}

fn instance_name(part: &str, n: usize) -> String {
    format!("{part}-{n}")
}

fn in_plane_name(instance: usize) -> String {
    if instance == 1 {
        "XY_plane_Motion".to_string()
    } else {
        format!("XY_plane_Motion_{instance}")
    }
}

impl ModelPlan {
    /// Assembles the plan for `config` from the two track outlines.
    pub fn new(config: &RunConfig, track: TrackOutline, cycloid: TrackOutline) -> Self {
        let reference_point = ReferencePlacement::EdgeMidpoint {
            edge: TRACK_RP_EDGE,
        };

        let parts = vec![
            PartSpec::RigidShell {
                name: TRACK_PART.to_string(),
                outline: track,
                extrude_depth: config.track.extrude_depth,
                reference_point,
            },
            PartSpec::RigidShell {
                name: CYCLOID_PART.to_string(),
                outline: cycloid,
                extrude_depth: config.track.extrude_depth,
                reference_point,
            },
            PartSpec::RevolvedSolid {
                name: BALL_PART.to_string(),
                radius: config.ball.radius,
                reference_point: BALL_CENTER.to_string(),
                section: BALL_PART.to_string(),
                body_set: BALL_BODY_SET.to_string(),
            },
        ];

        let instances = vec![
            InstanceSpec {
                name: instance_name(TRACK_PART, 1),
                part: TRACK_PART.to_string(),
                translation: [0.0; 3],
            },
            InstanceSpec {
                name: instance_name(BALL_PART, 1),
                part: BALL_PART.to_string(),
                translation: config.ball.start,
            },
            InstanceSpec {
                name: instance_name(CYCLOID_PART, 1),
                part: CYCLOID_PART.to_string(),
                translation: [0.0, 0.0, config.cycloid.z_offset],
            },
            InstanceSpec {
                name: instance_name(BALL_PART, 2),
                part: BALL_PART.to_string(),
                translation: config.ball.cycloid_start,
            },
        ];

        let seed = |part: &str, size: f64, shape: ElementShape| MeshSeed {
            part: part.to_string(),
            size,
            shape,
            deviation_factor: config.mesh.deviation_factor,
            min_size_factor: config.mesh.min_size_factor,
        };
        let mesh = vec![
            seed(BALL_PART, config.mesh.ball_seed, ElementShape::Tet),
            seed(TRACK_PART, config.mesh.track_seed, ElementShape::Shell),
            seed(CYCLOID_PART, config.mesh.track_seed, ElementShape::Shell),
        ];

        let mut boundary_conditions: Vec<BoundaryCondition> = (1..=2)
            .map(|n| BoundaryCondition::InPlane {
                name: in_plane_name(n),
                region: ball_center_set(n),
            })
            .collect();
        boundary_conditions.extend([TRACK_PART, CYCLOID_PART].map(|part| {
            BoundaryCondition::Encastre {
                name: format!("{part}_Fix"),
                region: track_rp_set(part),
            }
        }));

        let constraints = (1..=2)
            .map(|n| RigidBodySpec {
                name: format!("Rigidbody_{n}"),
                ref_point_region: ball_center_set(n),
                body_region: format!("{}.{BALL_BODY_SET}", instance_name(BALL_PART, n)),
            })
            .collect();

        Self {
            run: config.run,
            parts,
            material: MaterialSpec {
                name: config.material.name.clone(),
                density: config.material.density,
                youngs_modulus: config.material.youngs_modulus,
                poisson_ratio: config.material.poisson_ratio,
            },
            instances,
            mesh,
            contact: ContactSpec {
                property: "IntProp-1".to_string(),
                friction: 0.0,
                elastic_slip_fraction: 0.005,
                hard_normal: true,
                allow_separation: true,
            },
            boundary_conditions,
            constraints,
            step: StepSpec {
                name: config.step.name.clone(),
                period: config.step.period,
                increment: config.step.increment,
            },
            gravity: [0.0, config.step.gravity, 0.0],
            outputs: OutputSpec {
                field_variables: vec!["U".to_string(), "UT".to_string()],
                field_intervals: config.step.field_intervals,
                history_variable: HISTORY_VARIABLE.to_string(),
                history_region: ball_center_set(1),
                history_frequency: config.step.history_frequency,
            },
            job: JobSpec {
                name: config.job.name.clone(),
                input_file: config.input_file(),
                cpus: config.job.cpus,
            },
        }
    }

    /// Looks up a part by name.
    pub fn part(&self, name: &str) -> Option<&PartSpec> {
        self.parts.iter().find(|p| p.name() == name)
    }

    /// Looks up an instance by name.
    pub fn instance(&self, name: &str) -> Option<&InstanceSpec> {
        self.instances.iter().find(|i| i.name == name)
    }
}
