//! Integration tests for the timeline subsystem.
//!
//! Exercises doubleclips-core keyframes and settings through the structural
//! and editing operations of doubleclips-timeline.

use doubleclips_core::{EasingType, EditSettings, VideoProperties};
use doubleclips_timeline::{
    Clip, ClipHandle, ClipType, EditCommand, EditOutcome, Timeline, Track, TrimEdge,
};
use proptest::prelude::*;

// ── Helpers ────────────────────────────────────────────────────

fn video(name: &str, start: f64, duration: f64) -> Clip {
    Clip::new(ClipType::Video, name, start, duration).with_audio(true)
}

struct Fixture {
    timeline: Timeline,
    intro: ClipHandle,
    body: ClipHandle,
    outro: ClipHandle,
    music: ClipHandle,
}

fn build_timeline() -> Fixture {
    let mut timeline = Timeline::new();
    let v = timeline.add_track();
    let a = timeline.add_track();
    let t = timeline.add_track();

    let intro = timeline.add_clip(v, video("intro.mp4", 0.0, 5.0)).unwrap();
    let body = timeline.add_clip(v, video("body.mp4", 5.0, 30.0)).unwrap();
    let outro = timeline.add_clip(v, video("outro.mp4", 35.0, 10.0)).unwrap();
    let music = timeline
        .add_clip(a, Clip::new(ClipType::Audio, "music.m4a", 0.0, 45.0).with_audio(true))
        .unwrap();
    let mut title = Clip::new(ClipType::Text, "title", 1.0, 3.0);
    title.text_content = Some("Summer".into());
    timeline.add_clip(t, title);

    Fixture {
        timeline,
        intro,
        body,
        outro,
        music,
    }
}

fn fade_keyframes(clip: &mut Clip) {
    let visible = VideoProperties::default();
    let hidden = VideoProperties {
        value_opacity: 0.0,
        value_pos_x: 200.0,
        ..visible
    };
    clip.add_keyframe(0.0, visible, EasingType::EaseInOutSine, 0.01)
        .unwrap();
    clip.add_keyframe(clip.duration, hidden, EasingType::Linear, 0.01)
        .unwrap();
}

// ── Assembly & duration ────────────────────────────────────────

#[test]
fn timeline_duration_is_latest_clip_end() {
    let fx = build_timeline();
    assert_eq!(fx.timeline.duration(), 45.0);
    assert_eq!(fx.timeline.clip_count(), 5);
}

#[test]
fn track_and_clip_indices_match_positions() {
    let fx = build_timeline();
    for (i, track) in fx.timeline.tracks().iter().enumerate() {
        assert_eq!(track.timeline_index(), i);
        assert!(track.clips().iter().all(|c| c.track_index() == i));
    }
}

#[test]
fn removing_a_middle_track_renumbers_the_rest() {
    let mut timeline = Timeline::new();
    let ids: Vec<_> = (0..4).map(|_| timeline.add_track()).collect();
    for &id in &ids {
        timeline.add_clip(id, video("x.mp4", 0.0, 1.0));
    }

    timeline.remove_track(ids[1]);

    let indices: Vec<_> = timeline.tracks().iter().map(Track::timeline_index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    let remaining: Vec<_> = timeline.tracks().iter().map(Track::id).collect();
    assert_eq!(remaining, vec![ids[0], ids[2], ids[3]]);
    for (i, track) in timeline.tracks().iter().enumerate() {
        assert_eq!(track.clips()[0].track_index(), i);
    }
}

#[test]
fn deleting_last_clip_shrinks_duration() {
    let mut fx = build_timeline();
    fx.timeline.delete_clip(fx.music);
    assert_eq!(fx.timeline.duration(), 45.0);
    fx.timeline.delete_clip(fx.outro);
    assert_eq!(fx.timeline.duration(), 35.0);
}

#[test]
fn delete_with_out_of_range_track_is_ignored() {
    let mut fx = build_timeline();
    let bogus = ClipHandle {
        id: fx.body.id,
        track_index: 42,
    };
    assert!(fx.timeline.delete_clip(bogus).is_none());
    assert_eq!(fx.timeline.clip_count(), 5);
}

// ── Split ──────────────────────────────────────────────────────

#[test]
fn split_ten_second_clip_at_four() {
    let mut timeline = Timeline::new();
    let t = timeline.add_track();
    let a = timeline
        .add_clip(t, Clip::new(ClipType::Video, "a.mp4", 0.0, 10.0))
        .unwrap();

    let b = timeline.split_clip(a, 4.0).unwrap();

    let a = timeline.clip(a).unwrap();
    let b = timeline.clip(b).unwrap();
    assert_eq!((a.start_time, a.duration, a.start_clip_trim), (0.0, 4.0, 0.0));
    assert_eq!((b.start_time, b.duration, b.start_clip_trim), (4.0, 6.0, 4.0));
    assert_eq!(a.original_duration, 10.0);
    assert_eq!(b.original_duration, 10.0);
    assert_eq!(timeline.track(0).unwrap().clips()[1].id(), b.id());
}

#[test]
fn split_copies_clip_attributes() {
    let mut fx = build_timeline();
    fx.timeline.update_clip(fx.body, |clip| {
        clip.width = 1080;
        clip.height = 1920;
    });
    let tail = fx.timeline.split_clip(fx.body, 20.0).unwrap();
    let tail = fx.timeline.clip(tail).unwrap();
    assert_eq!(tail.clip_name, "body.mp4");
    assert_eq!(tail.clip_type, ClipType::Video);
    assert!(tail.has_audio);
    assert_eq!((tail.width, tail.height), (1080, 1920));
    assert_eq!(tail.track_index(), 0);
}

#[test]
fn split_outside_clip_changes_nothing() {
    let mut fx = build_timeline();
    assert!(fx.timeline.split_clip(fx.intro, 5.0).is_none());
    assert!(fx.timeline.split_clip(fx.intro, 0.0).is_none());
    assert!(fx.timeline.split_clip(fx.intro, 12.0).is_none());
    assert_eq!(fx.timeline.clip_count(), 5);
    assert_eq!(fx.timeline.clip(fx.intro).unwrap().duration, 5.0);
}

#[test]
fn split_keeps_animation_continuous() {
    let mut fx = build_timeline();
    fx.timeline.update_clip(fx.body, fade_keyframes);
    let before = fx.timeline.clip(fx.body).unwrap().properties_at(12.0);

    let tail = fx.timeline.split_clip(fx.body, 17.0).unwrap();

    let head = fx.timeline.clip(fx.body).unwrap();
    let tail = fx.timeline.clip(tail).unwrap();
    assert!(head.properties_at(12.0).max_abs_diff(&before) < 1e-9);
    assert!(head.properties_at(12.0).max_abs_diff(&tail.properties_at(0.0)) < 1e-9);
    assert!((tail.properties_at(tail.duration).value_opacity).abs() < 1e-9);
}

#[test]
fn split_with_stale_handle_is_a_noop() {
    let mut fx = build_timeline();
    let stale = fx.body;
    fx.timeline.delete_clip(fx.body);
    assert!(fx.timeline.split_clip(stale, 10.0).is_none());
    assert_eq!(fx.timeline.clip_count(), 4);
}

// ── Trim ───────────────────────────────────────────────────────

#[test]
fn trim_both_edges_of_body() {
    let mut fx = build_timeline();
    fx.timeline.trim_clip(fx.body, TrimEdge::Left, 2.0);
    fx.timeline.trim_clip(fx.body, TrimEdge::Right, -3.0);

    let body = fx.timeline.clip(fx.body).unwrap();
    assert_eq!(body.start_time, 7.0);
    assert_eq!(body.duration, 25.0);
    assert_eq!(body.start_clip_trim, 2.0);
    assert_eq!(body.end_clip_trim, 3.0);
}

#[test]
fn trim_respects_custom_minimum() {
    let mut fx = build_timeline();
    fx.timeline.set_settings(EditSettings {
        min_clip_duration: 2.0,
        ..Default::default()
    });
    fx.timeline.trim_clip(fx.intro, TrimEdge::Right, -100.0);
    assert_eq!(fx.timeline.clip(fx.intro).unwrap().duration, 2.0);
}

// ── Commands ───────────────────────────────────────────────────

#[test]
fn clone_then_move_with_snapping() {
    let mut fx = build_timeline();
    let Some(EditOutcome::ClipCloned(copy)) =
        EditCommand::CloneClip { clip: fx.outro }.apply(&mut fx.timeline)
    else {
        panic!("expected clone");
    };
    assert_eq!(fx.timeline.clip(copy).unwrap().start_time, 45.0);
    assert_eq!(fx.timeline.duration(), 55.0);

    // 5.04 is within the snap threshold of the intro/body cut.
    let Some(EditOutcome::ClipMoved { start, .. }) = (EditCommand::MoveClip {
        clip: copy,
        start: 5.04,
    })
    .apply(&mut fx.timeline) else {
        panic!("expected move");
    };
    assert_eq!(start, 5.0);
    assert_eq!(fx.timeline.duration(), 45.0);
}

#[test]
fn commands_on_removed_track_report_nothing() {
    let mut fx = build_timeline();
    let audio_track = fx.timeline.track(1).unwrap().id();
    assert!(matches!(
        EditCommand::RemoveTrack { track: audio_track }.apply(&mut fx.timeline),
        Some(EditOutcome::TrackRemoved(_))
    ));
    assert!(EditCommand::DeleteClip { clip: fx.music }
        .apply(&mut fx.timeline)
        .is_none());
    assert!(EditCommand::RemoveTrack { track: audio_track }
        .apply(&mut fx.timeline)
        .is_none());
}

// ── Keyframes ──────────────────────────────────────────────────

#[test]
fn keyframe_values_hold_at_keyframe_times_for_every_curve() {
    for easing in EasingType::ALL {
        let mut clip = video("k.mp4", 0.0, 4.0);
        let a = VideoProperties {
            value_rot: 10.0,
            ..Default::default()
        };
        let b = VideoProperties {
            value_rot: 80.0,
            value_opacity: 0.25,
            ..Default::default()
        };
        clip.add_keyframe(1.0, a, easing, 0.01).unwrap();
        clip.add_keyframe(3.0, b, easing, 0.01).unwrap();

        assert_eq!(clip.properties_at(1.0), a, "{easing}");
        assert_eq!(clip.properties_at(3.0), b, "{easing}");
        assert_eq!(clip.properties_at(0.0), a, "{easing}");
        assert_eq!(clip.properties_at(4.0), b, "{easing}");
    }
}

#[test]
fn static_clip_evaluates_to_base_properties() {
    let mut clip = video("s.mp4", 0.0, 4.0);
    clip.video_properties.value_pos_x = 33.0;
    assert_eq!(clip.properties_at(2.0), clip.video_properties);
}

// ── Properties ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn split_conserves_total_duration_and_source_coverage(
        duration in 0.5f64..120.0,
        trim in 0.0f64..30.0,
        frac in 0.001f64..0.999,
    ) {
        let mut timeline = Timeline::new();
        let t = timeline.add_track();
        let clip = Clip::new(ClipType::Video, "p.mp4", 3.0, duration)
            .with_source(trim, trim + duration);
        let a = timeline.add_clip(t, clip).unwrap();
        let at = 3.0 + duration * frac;

        if let Some(b) = timeline.split_clip(a, at) {
            let a = timeline.clip(a).unwrap();
            let b = timeline.clip(b).unwrap();
            prop_assert!((a.duration + b.duration - duration).abs() < 1e-9);
            prop_assert!((a.start_clip_trim - trim).abs() < 1e-12);
            prop_assert!((b.start_clip_trim - (trim + (at - 3.0))).abs() < 1e-9);
            prop_assert!((b.start_time - at).abs() < 1e-12);
            prop_assert!((timeline.duration() - (3.0 + duration)).abs() < 1e-9);
        }
    }

    #[test]
    fn trims_never_go_below_minimum(
        deltas in proptest::collection::vec((any::<bool>(), -20.0f64..20.0), 1..30),
    ) {
        let mut timeline = Timeline::new();
        let t = timeline.add_track();
        let h = timeline.add_clip(t, video("t.mp4", 10.0, 8.0)).unwrap();
        for (left, delta) in deltas {
            let edge = if left { TrimEdge::Left } else { TrimEdge::Right };
            timeline.trim_clip(h, edge, delta);
            let clip = timeline.clip(h).unwrap();
            prop_assert!(clip.duration >= 0.5 - 1e-12);
            prop_assert!(clip.start_clip_trim >= 0.0);
            prop_assert!(clip.end_clip_trim >= 0.0);
            prop_assert!((timeline.duration() - clip.end_time().max(0.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn add_then_remove_tracks_keeps_dense_indices(
        count in 1usize..12,
        removals in proptest::collection::vec(any::<prop::sample::Index>(), 0..8),
    ) {
        let mut timeline = Timeline::new();
        for _ in 0..count {
            let id = timeline.add_track();
            timeline.add_clip(id, video("r.mp4", 0.0, 1.0));
        }
        for pick in removals {
            if timeline.track_count() == 0 {
                break;
            }
            let id = timeline.track(pick.index(timeline.track_count())).unwrap().id();
            timeline.remove_track(id);
        }
        for (i, track) in timeline.tracks().iter().enumerate() {
            prop_assert_eq!(track.timeline_index(), i);
            prop_assert!(track.clips().iter().all(|c| c.track_index() == i));
        }
    }
}
