use std::sync::Arc;

use spriter_animation_core::{
    Animator, AnimatorCommand, AnimatorEvent, Config, Document, EvalError, VarValue,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn animator() -> Animator {
    let doc: Document =
        spriter_test_fixtures::documents::load("squares").expect("load squares fixture");
    Animator::new(Arc::new(doc), 0, Config::default()).expect("animator")
}

fn finished(name: &str) -> AnimatorEvent {
    AnimatorEvent::AnimationFinished {
        animation: name.into(),
    }
}

#[test]
fn starts_on_first_animation() {
    let anim = animator();
    assert_eq!(anim.current_animation().name, "spin");
    assert_eq!(
        anim.animation_names().collect::<Vec<_>>(),
        vec!["spin", "walk", "idle"]
    );
    assert_eq!(anim.time(), 0.0);
    assert_eq!(anim.speed(), 1.0);
    assert!(!anim.is_transitioning());
}

#[test]
fn missing_entity_is_rejected() {
    let doc: Document = spriter_test_fixtures::documents::load("squares").unwrap();
    let err = Animator::new(Arc::new(doc), 7, Config::default()).unwrap_err();
    assert_eq!(err, EvalError::MissingEntity { entity: 7 });
}

#[test]
fn step_evaluates_and_exposes_variables() {
    let mut anim = animator();
    let frame = anim.step(250.0).unwrap();
    assert_eq!(frame.sprites.len(), 1);
    assert_eq!(anim.time(), 250.0);
    assert!(anim.events().is_empty());

    let mut names: Vec<&str> = anim.var_names().collect();
    names.sort();
    assert_eq!(names, vec!["mood", "speed"]);
    assert_eq!(anim.var_value("speed"), Some(&VarValue::Float(25.0)));
}

#[test]
fn looping_wrap_reports_finished() {
    let mut anim = animator();
    anim.seek(900.0);
    anim.step(200.0).unwrap();
    assert_eq!(anim.time(), 100.0);
    assert_eq!(anim.events(), &[finished("spin")]);

    // events only live for one step
    anim.step(10.0).unwrap();
    assert!(anim.events().is_empty());
}

#[test]
fn non_looping_clamps_and_reports_once() {
    let mut anim = animator();
    anim.play("idle").unwrap();
    anim.step(400.0).unwrap();
    assert!(anim.events().is_empty());

    anim.step(400.0).unwrap();
    assert_eq!(anim.time(), 500.0);
    assert_eq!(anim.take_events(), vec![finished("idle")]);
    assert!(anim.events().is_empty());

    anim.step(100.0).unwrap();
    assert_eq!(anim.time(), 500.0);
    assert!(anim.events().is_empty());
}

#[test]
fn reverse_playback_wraps_backwards() {
    let mut anim = animator();
    anim.reverse();
    assert_eq!(anim.speed(), -1.0);
    anim.step(100.0).unwrap();
    assert_eq!(anim.time(), 900.0);
    assert_eq!(anim.events(), &[finished("spin")]);
}

#[test]
fn transition_blends_then_switches() {
    let mut anim = animator();
    anim.transition("walk", 100.0).unwrap();
    assert!(anim.is_transitioning());
    assert_eq!(anim.next_animation().map(|a| a.name.as_str()), Some("walk"));

    let frame = anim.step(50.0).unwrap();
    // blended frames carry sprites only
    assert_eq!(frame.sprites.len(), 1);
    assert!(frame.points.is_empty());
    assert!(frame.variables.is_empty());
    approx(anim.blend_factor(), 0.5, 1e-6);
    assert_eq!(anim.current_animation().name, "spin");

    anim.step(50.0).unwrap();
    assert!(!anim.is_transitioning());
    assert_eq!(anim.current_animation().name, "walk");
    assert_eq!(
        anim.events(),
        &[AnimatorEvent::TransitionFinished {
            from: "spin".into(),
            to: "walk".into()
        }]
    );
    // 50 of 1000 maps to 100 of 2000, then this step's 50 is added
    approx(anim.time(), 150.0, 1e-3);
    assert_eq!(anim.blend_factor(), 0.0);
}

#[test]
fn zero_length_transition_plays_directly() {
    let mut anim = animator();
    anim.seek(300.0);
    anim.transition("walk", 0.0).unwrap();
    assert!(!anim.is_transitioning());
    assert_eq!(anim.current_animation().name, "walk");
    assert_eq!(anim.time(), 0.0);
}

#[test]
fn unknown_animation_names_are_errors() {
    let mut anim = animator();
    let err = anim.play("run").unwrap_err();
    assert_eq!(
        err,
        EvalError::UnknownAnimation {
            entity: 0,
            name: "run".into()
        }
    );
    assert!(anim.transition("run", 100.0).is_err());
    assert_eq!(anim.current_animation().name, "spin");
}

#[test]
fn commands_drive_playback() {
    let mut anim = animator();
    let cmds: Vec<AnimatorCommand> = serde_json::from_str(
        r#"[
            { "Play": { "animation": "walk" } },
            { "Seek": { "time": 300.0 } },
            { "SetSpeed": { "speed": 2.0 } }
        ]"#,
    )
    .unwrap();
    for cmd in cmds {
        anim.apply(cmd).unwrap();
    }
    anim.step(10.0).unwrap();
    assert_eq!(anim.current_animation().name, "walk");
    assert_eq!(anim.time(), 320.0);

    anim.apply(AnimatorCommand::Reverse).unwrap();
    anim.step(10.0).unwrap();
    assert_eq!(anim.time(), 300.0);

    let err = anim
        .apply(AnimatorCommand::Transition {
            animation: "nope".into(),
            total_time: 10.0,
        })
        .unwrap_err();
    assert!(matches!(err, EvalError::UnknownAnimation { .. }));
}
