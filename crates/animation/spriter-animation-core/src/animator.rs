//! Animator: playback state for one entity, driving the evaluator once per tick.
//!
//! Owns what the evaluator deliberately does not: current animation, time, speed,
//! and the progress of a timed transition to another animation. While a transition
//! runs, frames come from `evaluate_blend` with factor `elapsed / total`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::data::{Animation, Document, Entity};
use crate::error::EvalError;
use crate::evaluator::Evaluator;
use crate::frame::Frame;
use crate::value::VarValue;

/// Discrete signals emitted while stepping. Cleared at the start of every step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AnimatorEvent {
    /// Playback crossed the end (or the start, when playing backwards).
    AnimationFinished { animation: String },
    TransitionFinished { from: String, to: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AnimatorCommand {
    Play { animation: String },
    Transition { animation: String, total_time: f32 },
    SetSpeed { speed: f32 },
    Reverse,
    Seek { time: f32 },
}

#[derive(Clone, Copy, Debug)]
struct Transition {
    target: usize,
    elapsed: f32,
    total: f32,
}

impl Transition {
    fn factor(&self) -> f32 {
        (self.elapsed / self.total).clamp(0.0, 1.0)
    }
}

#[derive(Debug)]
pub struct Animator {
    document: Arc<Document>,
    entity: usize,
    config: Config,
    current: usize,
    transition: Option<Transition>,
    speed: f32,
    time: f32,
    frame: Frame,
    events: Vec<AnimatorEvent>,
}

impl Animator {
    /// Create an animator for `entity`, starting on its first animation.
    pub fn new(document: Arc<Document>, entity: usize, config: Config) -> Result<Self, EvalError> {
        let ent = document.entity(entity)?;
        if ent.animations.is_empty() {
            return Err(EvalError::InvalidDocument {
                reason: format!("entity '{}' has no animations", ent.name),
            });
        }
        let frame = Frame::with_capacity(&config);
        Ok(Self {
            document,
            entity,
            config,
            current: 0,
            transition: None,
            speed: 1.0,
            time: 0.0,
            frame,
            events: Vec::new(),
        })
    }

    pub fn entity(&self) -> &Entity {
        // validated in new(); entities are never removed from a shared document
        &self.document.entities[self.entity]
    }

    pub fn animation_names(&self) -> impl Iterator<Item = &str> {
        self.entity().animations.iter().map(|a| a.name.as_str())
    }

    pub fn current_animation(&self) -> &Animation {
        &self.entity().animations[self.current]
    }

    /// Animation being transitioned to, if a transition is running.
    pub fn next_animation(&self) -> Option<&Animation> {
        self.transition
            .map(|tr| &self.entity().animations[tr.target])
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn reverse(&mut self) {
        self.speed = -self.speed;
    }

    pub fn seek(&mut self, time: f32) {
        self.time = time;
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Current blend factor towards the next animation (0 when not transitioning).
    pub fn blend_factor(&self) -> f32 {
        self.transition.map_or(0.0, |tr| tr.factor())
    }

    fn index_of(&self, name: &str) -> Result<usize, EvalError> {
        self.entity()
            .animations
            .iter()
            .position(|a| a.name == name)
            .ok_or_else(|| EvalError::UnknownAnimation {
                entity: self.entity,
                name: name.to_string(),
            })
    }

    /// Switch to `name` immediately, restarting from time 0.
    pub fn play(&mut self, name: &str) -> Result<(), EvalError> {
        let idx = self.index_of(name)?;
        debug!(entity = self.entity, animation = name, "play");
        self.current = idx;
        self.time = 0.0;
        self.transition = None;
        Ok(())
    }

    /// Cross-fade to `name` over `total_time`; a non-positive duration plays directly.
    pub fn transition(&mut self, name: &str, total_time: f32) -> Result<(), EvalError> {
        if total_time.is_nan() || total_time <= 0.0 {
            return self.play(name);
        }
        let target = self.index_of(name)?;
        debug!(
            entity = self.entity,
            from = %self.current_animation().name,
            to = name,
            total_time,
            "transition"
        );
        self.transition = Some(Transition {
            target,
            elapsed: 0.0,
            total: total_time,
        });
        Ok(())
    }

    pub fn apply(&mut self, cmd: AnimatorCommand) -> Result<(), EvalError> {
        match cmd {
            AnimatorCommand::Play { animation } => self.play(&animation)?,
            AnimatorCommand::Transition {
                animation,
                total_time,
            } => self.transition(&animation, total_time)?,
            AnimatorCommand::SetSpeed { speed } => self.set_speed(speed),
            AnimatorCommand::Reverse => self.reverse(),
            AnimatorCommand::Seek { time } => self.seek(time),
        }
        Ok(())
    }

    /// Advance by `dt` (scaled by speed) and evaluate the frame for the new time.
    pub fn step(&mut self, dt: f32) -> Result<&Frame, EvalError> {
        self.events.clear();
        let elapsed = dt * self.speed;

        if let Some(tr) = self.transition.as_mut() {
            tr.elapsed += elapsed.abs();
            if tr.elapsed >= tr.total {
                self.finish_transition();
            }
        }

        self.advance(elapsed);

        let document = Arc::clone(&self.document);
        let evaluator = Evaluator::new(&document, self.config.clone());
        let current = document.animation(self.entity, self.current)?;
        match self.transition {
            Some(tr) => {
                let next = document.animation(self.entity, tr.target)?;
                evaluator.evaluate_blend_into(current, next, self.time, tr.factor(), &mut self.frame)?;
            }
            None => evaluator.evaluate_single_into(current, self.time, &mut self.frame)?,
        }
        Ok(&self.frame)
    }

    fn finish_transition(&mut self) {
        let Some(tr) = self.transition.take() else {
            return;
        };
        let animations = &self.document.entities[self.entity].animations;
        let from = &animations[self.current];
        let to = &animations[tr.target];
        // keep the relative progress through the cycle
        if from.length > 0.0 {
            self.time = self.time / from.length * to.length;
        }
        debug!(entity = self.entity, from = %from.name, to = %to.name, "transition finished");
        self.events.push(AnimatorEvent::TransitionFinished {
            from: from.name.clone(),
            to: to.name.clone(),
        });
        self.current = tr.target;
    }

    fn advance(&mut self, elapsed: f32) {
        let anim = &self.document.entities[self.entity].animations[self.current];
        let length = anim.length;
        if length.is_nan() || length <= 0.0 {
            self.time = 0.0;
            return;
        }

        let prev = self.time;
        let mut t = prev + elapsed;
        if t >= length || t < 0.0 {
            let crossed = if anim.looping {
                t = t.rem_euclid(length);
                if t >= length {
                    t = 0.0;
                }
                true
            } else {
                t = t.clamp(0.0, length);
                t != prev
            };
            if crossed {
                self.events.push(AnimatorEvent::AnimationFinished {
                    animation: anim.name.clone(),
                });
            }
        }
        self.time = t;
    }

    /// Events emitted by the last step.
    pub fn events(&self) -> &[AnimatorEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<AnimatorEvent> {
        std::mem::take(&mut self.events)
    }

    /// Frame produced by the last step.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Names of the variables resolved in the last frame.
    pub fn var_names(&self) -> impl Iterator<Item = &str> {
        self.frame.variables.keys().map(String::as_str)
    }

    pub fn var_value(&self, name: &str) -> Option<&VarValue> {
        self.frame.variable(name)
    }
}
