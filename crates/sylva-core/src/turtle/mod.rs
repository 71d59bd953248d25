//! 3D turtle interpretation of a sentence into a skeleton
//!
//! The turtle walks the sentence once, left to right. `[` saves the full
//! cursor state on a stack and `]` restores it, so branches grow from the
//! node where they were opened.
//!
//! | Symbol | Effect                                       | Default |
//! |--------|----------------------------------------------|---------|
//! | `F`    | move forward, emit node and segment          | 1.0     |
//! | `+ -`  | yaw around local up (+Z)                     | 30°     |
//! | `^ &`  | pitch around local right (+X)                | 30°     |
//! | `/ \`  | roll around local forward (+Y)               | 30°     |
//! | `[ ]`  | push / pop state                             |         |
//! | `L`    | place a leaf at the cursor                   | 1.0     |

mod skeleton;

use crate::grammar::symbol::{self, Symbol};
use crate::grammar::LSystemConfig;
use crate::math::{self, axis_rotation, local_axes, normalize_quat_or_identity};
use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

pub use skeleton::{LeafPoint, Skeleton, SkeletonNode, SkeletonSegment};

/// Parameters of the turtle walk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurtleConfig {
    /// Radius at depth 0
    pub base_radius: f64,
    /// Radius multiplier per nesting level
    pub radius_falloff: f64,
    /// Step length for `F` without a length parameter
    pub default_length: f64,
    /// Turn in degrees for rotations without an angle parameter
    pub default_angle: f64,
}

impl Default for TurtleConfig {
    fn default() -> Self {
        Self {
            base_radius: 0.1,
            radius_falloff: 0.7,
            default_length: 1.0,
            default_angle: 30.0,
        }
    }
}

impl TurtleConfig {
    /// Take radius settings from a grammar config
    pub fn from_lsystem(config: &LSystemConfig) -> Self {
        Self {
            base_radius: config.base_radius,
            radius_falloff: config.radius_falloff,
            ..Self::default()
        }
    }

    /// Radius of a node created at `depth`
    pub fn radius_at(&self, depth: usize) -> f64 {
        self.base_radius * self.radius_falloff.powi(depth as i32)
    }
}

/// Cursor state saved and restored by brackets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurtleState {
    pub position: DVec3,
    pub orientation: DQuat,
    pub radius: f64,
    pub depth: usize,
    pub node_id: usize,
}

impl TurtleState {
    /// Direction of travel
    pub fn forward(&self) -> DVec3 {
        local_axes(self.orientation).0
    }

    /// Turn by `degrees` around the turtle's own `axis`
    fn rotate_local(&mut self, axis: DVec3, degrees: f64) {
        let delta = axis_rotation(axis, degrees);
        self.orientation = normalize_quat_or_identity(self.orientation * delta);
    }
}

/// Stack machine that builds a skeleton symbol by symbol
#[derive(Debug, Clone)]
pub struct Turtle {
    config: TurtleConfig,
    state: TurtleState,
    stack: Vec<TurtleState>,
    skeleton: Skeleton,
}

impl Turtle {
    /// Start at the origin facing +Y, with the root node already emitted
    pub fn new(config: TurtleConfig) -> Self {
        let state = TurtleState {
            position: DVec3::ZERO,
            orientation: DQuat::IDENTITY,
            radius: config.base_radius,
            depth: 0,
            node_id: 0,
        };
        let root = SkeletonNode {
            id: 0,
            position: state.position,
            orientation: state.orientation,
            radius: state.radius,
            parent_id: None,
            depth: 0,
            is_terminal: false,
            is_branch_point: false,
        };
        Self {
            config,
            state,
            stack: Vec::new(),
            skeleton: Skeleton {
                nodes: vec![root],
                ..Skeleton::default()
            },
        }
    }

    pub fn state(&self) -> &TurtleState {
        &self.state
    }

    /// Number of saved states
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Execute one symbol
    pub fn apply(&mut self, symbol: &Symbol) {
        let angle = symbol.params.angle.unwrap_or(self.config.default_angle);
        match symbol.tag {
            symbol::FORWARD => {
                let length = symbol.params.length.unwrap_or(self.config.default_length);
                self.forward(length);
            }
            symbol::YAW_LEFT => self.state.rotate_local(math::UP, angle),
            symbol::YAW_RIGHT => self.state.rotate_local(math::UP, -angle),
            symbol::PITCH_UP => self.state.rotate_local(math::RIGHT, angle),
            symbol::PITCH_DOWN => self.state.rotate_local(math::RIGHT, -angle),
            symbol::ROLL_LEFT => self.state.rotate_local(math::FORWARD, angle),
            symbol::ROLL_RIGHT => self.state.rotate_local(math::FORWARD, -angle),
            symbol::PUSH => {
                self.stack.push(self.state);
                self.state.depth += 1;
            }
            symbol::POP => {
                if let Some(saved) = self.stack.pop() {
                    self.state = saved;
                }
            }
            symbol::LEAF => {
                self.skeleton.leaves.push(LeafPoint {
                    position: self.state.position,
                    orientation: self.state.orientation,
                    size: symbol.params.size.unwrap_or(1.0),
                });
            }
            _ => {}
        }
    }

    fn forward(&mut self, length: f64) {
        let parent_id = self.state.node_id;
        let start_radius = self.skeleton.nodes[parent_id].radius;

        let position = self.state.position + self.state.forward() * length;
        let radius = self.config.radius_at(self.state.depth);
        let id = self.skeleton.nodes.len();

        self.skeleton.nodes.push(SkeletonNode {
            id,
            position,
            orientation: self.state.orientation,
            radius,
            parent_id: Some(parent_id),
            depth: self.state.depth,
            is_terminal: false,
            is_branch_point: false,
        });
        self.skeleton.segments.push(SkeletonSegment {
            start: parent_id,
            end: id,
            length,
            start_radius,
            end_radius: radius,
        });

        self.state.position = position;
        self.state.radius = radius;
        self.state.node_id = id;
    }

    /// Finish the walk and annotate terminal and branch-point nodes
    pub fn finish(mut self) -> Skeleton {
        self.skeleton.annotate();
        self.skeleton
    }
}

/// Interpret a whole sentence
pub fn interpret(sentence: &[Symbol], config: &TurtleConfig) -> Skeleton {
    let mut turtle = Turtle::new(*config);
    for symbol in sentence {
        turtle.apply(symbol);
    }
    let skeleton = turtle.finish();
    tracing::debug!(
        nodes = skeleton.nodes.len(),
        segments = skeleton.segments.len(),
        leaves = skeleton.leaves.len(),
        "interpreted sentence"
    );
    skeleton
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::symbol::parse_sentence;
    use crate::random::SeededRandom;
    use approx::assert_relative_eq;

    fn sentence(text: &str) -> Vec<Symbol> {
        text.chars().map(Symbol::bare).collect()
    }

    fn config() -> TurtleConfig {
        TurtleConfig {
            base_radius: 0.5,
            radius_falloff: 0.6,
            ..TurtleConfig::default()
        }
    }

    #[test]
    fn single_forward_makes_two_nodes() {
        let skeleton = interpret(&sentence("F"), &config());
        assert_eq!(skeleton.nodes.len(), 2);
        assert_eq!(skeleton.segments.len(), 1);
        assert!(skeleton.leaves.is_empty());

        let tip = &skeleton.nodes[1];
        assert_relative_eq!(tip.position.y, 1.0, epsilon = 1e-12);
        assert_eq!(tip.parent_id, Some(0));
        assert!(tip.is_terminal);
        assert!(!skeleton.nodes[0].is_terminal);
    }

    #[test]
    fn empty_sentence_has_only_root() {
        let skeleton = interpret(&[], &config());
        assert_eq!(skeleton.nodes.len(), 1);
        assert!(skeleton.nodes[0].is_terminal);
        assert_eq!(skeleton.nodes[0].parent_id, None);
    }

    #[test]
    fn bracketed_branches_create_branch_point() {
        let skeleton = interpret(&sentence("F[+F][-F]"), &config());
        assert_eq!(skeleton.nodes.len(), 4);
        assert!(skeleton.nodes[1].is_branch_point);
        assert!(!skeleton.nodes[0].is_branch_point);
        assert!(skeleton.nodes[2].is_terminal && skeleton.nodes[3].is_terminal);
        assert_eq!(skeleton.segments[1].start, 1);
        assert_eq!(skeleton.segments[2].start, 1);
    }

    #[test]
    fn radius_follows_depth_law() {
        let cfg = config();
        let skeleton = interpret(&sentence("F[F[F]]"), &cfg);
        for node in &skeleton.nodes[1..] {
            let expected = cfg.base_radius * cfg.radius_falloff.powi(node.depth as i32);
            assert_relative_eq!(node.radius, expected, epsilon = 1e-12);
        }
        assert_eq!(skeleton.nodes[3].depth, 2);
    }

    #[test]
    fn segments_cache_endpoint_radii() {
        let cfg = config();
        let skeleton = interpret(&sentence("F[F]"), &cfg);
        let branch = skeleton.segments[1];
        assert_relative_eq!(branch.start_radius, cfg.radius_at(0));
        assert_relative_eq!(branch.end_radius, cfg.radius_at(1));
    }

    #[test]
    fn pop_restores_position_and_node() {
        let mut turtle = Turtle::new(config());
        for s in sentence("F[+FF]") {
            turtle.apply(&s);
        }
        assert_eq!(turtle.state().node_id, 1);
        assert_relative_eq!(turtle.state().position.y, 1.0, epsilon = 1e-12);
        assert_eq!(turtle.state().depth, 0);
        assert_eq!(turtle.stack_depth(), 0);
    }

    #[test]
    fn pop_on_empty_stack_is_noop() {
        let mut turtle = Turtle::new(config());
        turtle.apply(&Symbol::bare('F'));
        let before = *turtle.state();
        turtle.apply(&Symbol::bare(']'));
        assert_eq!(*turtle.state(), before);
    }

    #[test]
    fn unknown_symbols_are_ignored() {
        let skeleton = interpret(&sentence("XAZ?"), &config());
        assert_eq!(skeleton.nodes.len(), 1);
        assert!(skeleton.segments.is_empty());
    }

    #[test]
    fn yaw_turns_forward_around_up() {
        let skeleton = interpret(&[Symbol::rotation('+', 90.0), Symbol::forward(2.0)], &config());
        let tip = skeleton.nodes[1].position;
        assert_relative_eq!(tip.x, -2.0, epsilon = 1e-9);
        assert_relative_eq!(tip.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn pitch_turns_forward_around_right() {
        let skeleton = interpret(&[Symbol::rotation('^', 90.0), Symbol::forward(1.0)], &config());
        let tip = skeleton.nodes[1].position;
        assert_relative_eq!(tip.z, 1.0, epsilon = 1e-9);
        assert_relative_eq!(tip.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn roll_keeps_heading() {
        let skeleton = interpret(&[Symbol::rotation('/', 45.0), Symbol::forward(1.0)], &config());
        let tip = skeleton.nodes[1].position;
        assert_relative_eq!(tip.y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn rotations_compose_in_local_frame() {
        let two_yaws = interpret(
            &[
                Symbol::rotation('+', 90.0),
                Symbol::rotation('+', 90.0),
                Symbol::forward(1.0),
            ],
            &config(),
        );
        assert_relative_eq!(two_yaws.nodes[1].position.y, -1.0, epsilon = 1e-9);

        // After pitching up, a yaw turns around the tilted up axis
        let turtle_frame = interpret(
            &[
                Symbol::rotation('^', 90.0),
                Symbol::rotation('+', 90.0),
                Symbol::forward(1.0),
            ],
            &config(),
        );
        let tip = turtle_frame.nodes[1].position;
        assert_relative_eq!(tip.x, -1.0, epsilon = 1e-9);
        assert_relative_eq!(tip.z, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn leaves_do_not_move_cursor() {
        let skeleton = interpret(&[Symbol::forward(1.0), Symbol::leaf(2.5)], &config());
        assert_eq!(skeleton.nodes.len(), 2);
        assert_eq!(skeleton.leaves.len(), 1);
        assert_relative_eq!(skeleton.leaves[0].position.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(skeleton.leaves[0].size, 2.5);
    }

    #[test]
    fn parameterless_symbols_use_defaults() {
        let cfg = TurtleConfig {
            default_length: 3.0,
            ..config()
        };
        let skeleton = interpret(&sentence("FL"), &cfg);
        assert_relative_eq!(skeleton.segments[0].length, 3.0);
        assert_relative_eq!(skeleton.leaves[0].size, 1.0);
    }

    #[test]
    fn node_ids_are_dense_and_parents_precede_children() {
        let mut rng = SeededRandom::new("ids");
        let grammar = LSystemConfig::default().with_variability(0.3);
        let symbols = parse_sentence("F[+F[-F]F]F[^FL]&F", 0, &grammar, &mut rng);
        let skeleton = interpret(&symbols, &config());
        for (index, node) in skeleton.nodes.iter().enumerate() {
            assert_eq!(node.id, index);
            if let Some(parent) = node.parent_id {
                assert!(parent < node.id);
            }
        }
        for segment in &skeleton.segments {
            assert!(segment.start < skeleton.nodes.len());
            assert!(segment.end < skeleton.nodes.len());
        }
    }
}
