//! Integration tests for `project.timeline` persistence.
//!
//! Saves edited timelines, loads them back, and reads documents written by
//! the mobile editor.

use doubleclips_core::{DoubleClipsError, EasingType, VideoProperties, VideoSettings};
use doubleclips_timeline::serialization::timeline_path;
use doubleclips_timeline::{
    Clip, ClipType, EffectTemplate, TimelineDocument, Timeline, TransitionClip, TransitionMode,
    TrimEdge, SETTINGS_FILE_NAME,
};

// ── Helpers ────────────────────────────────────────────────────

const EPS: f64 = 1e-6;

fn edited_timeline() -> Timeline {
    let mut timeline = Timeline::new();
    let main = timeline.add_track();
    let titles = timeline.add_track();

    let mut clip = Clip::new(ClipType::Video, "walk.mp4", 0.0, 12.0)
        .with_audio(true)
        .with_source(2.0, 20.0);
    clip.end_transition = Some(TransitionClip {
        track_index: 0,
        start_time: 11.5,
        duration: 0.5,
        effect: EffectTemplate::new("fade", 0.5, 0.0),
        mode: TransitionMode::EndFirst,
    });
    clip.end_transition_enabled = true;
    let walk = timeline.add_clip(main, clip).unwrap();
    timeline
        .add_keyframe(walk, 0.0, VideoProperties::default(), EasingType::EaseOutBack)
        .unwrap();
    let zoomed = VideoProperties {
        value_scale_x: 1.5,
        value_scale_y: 1.5,
        value_rot: 30.0,
        ..VideoProperties::default()
    };
    timeline
        .add_keyframe(walk, 10.0, zoomed, EasingType::Linear)
        .unwrap();

    let tail = timeline.split_clip(walk, 6.0).unwrap();
    timeline.trim_clip(tail, TrimEdge::Right, -1.5);

    let mut title = Clip::new(ClipType::Text, "title", 0.5, 3.0);
    title.text_content = Some("Day one".into());
    title.font_size = Some(64.0);
    title.is_locked_for_template = true;
    timeline.add_clip(titles, title);
    timeline
}

fn assert_close(a: f64, b: f64, what: &str) {
    assert!((a - b).abs() < EPS, "{what}: {a} != {b}");
}

fn assert_properties_close(a: &VideoProperties, b: &VideoProperties) {
    assert!(a.max_abs_diff(b) < EPS, "{a:?} != {b:?}");
}

/// Everything persisted about a clip, ids aside.
fn assert_clips_match(a: &Clip, b: &Clip) {
    assert_eq!(a.clip_type, b.clip_type);
    assert_eq!(a.clip_name, b.clip_name);
    assert_close(a.start_time, b.start_time, "start_time");
    assert_close(a.duration, b.duration, "duration");
    assert_close(a.start_clip_trim, b.start_clip_trim, "start_clip_trim");
    assert_close(a.end_clip_trim, b.end_clip_trim, "end_clip_trim");
    assert_close(a.original_duration, b.original_duration, "original_duration");
    assert_eq!(a.track_index(), b.track_index());
    assert_eq!((a.width, a.height), (b.width, b.height));
    assert_properties_close(&a.video_properties, &b.video_properties);

    let (ka, kb) = (a.keyframes.keyframes(), b.keyframes.keyframes());
    assert_eq!(ka.len(), kb.len());
    for (x, y) in ka.iter().zip(kb) {
        assert_close(x.time, y.time, "keyframe time");
        assert_eq!(x.easing, y.easing);
        assert_properties_close(&x.value, &y.value);
    }

    assert_eq!(a.effect, b.effect);
    assert_eq!(a.text_content, b.text_content);
    assert_eq!(a.font_size, b.font_size);
    assert_eq!(a.end_transition, b.end_transition);
    assert_eq!(a.end_transition_enabled, b.end_transition_enabled);
    assert_eq!(a.has_audio, b.has_audio);
    assert_eq!(a.is_mute, b.is_mute);
    assert_eq!(a.is_locked_for_template, b.is_locked_for_template);
    assert_eq!(a.is_reverse, b.is_reverse);
}

fn assert_timelines_match(a: &Timeline, b: &Timeline) {
    assert_close(a.duration(), b.duration(), "timeline duration");
    assert_eq!(a.track_count(), b.track_count());
    for (ta, tb) in a.tracks().iter().zip(b.tracks()) {
        assert_eq!(ta.timeline_index(), tb.timeline_index());
        assert_eq!(ta.clip_count(), tb.clip_count());
        for (ca, cb) in ta.clips().iter().zip(tb.clips()) {
            assert_clips_match(ca, cb);
        }
    }
}

// ── Round trips ────────────────────────────────────────────────

#[test]
fn edited_timeline_survives_json_round_trip() {
    let original = edited_timeline();
    let json = TimelineDocument::new(original.clone()).to_json().unwrap();
    let loaded = TimelineDocument::from_json(&json).unwrap();

    assert!(loaded.repairs.is_clean());
    assert_timelines_match(&original, &loaded.timeline);

    // Split moved the transition to the tail.
    let main = loaded.timeline.track(0).unwrap();
    assert!(main.clips()[0].end_transition.is_none());
    assert!(main.clips()[1].end_transition_enabled);
}

#[test]
fn identities_are_fresh_after_load() {
    let original = edited_timeline();
    let json = TimelineDocument::new(original.clone()).to_json().unwrap();
    let loaded = TimelineDocument::from_json(&json).unwrap().into_timeline();

    let before: Vec<_> = original.clips().map(|c| c.id()).collect();
    let after: Vec<_> = loaded.clips().map(|c| c.id()).collect();
    assert_eq!(before.len(), after.len());
    assert!(after.iter().all(|id| !before.contains(id)));
    assert_ne!(
        original.track(0).unwrap().id(),
        loaded.track(0).unwrap().id()
    );
}

#[test]
fn project_directory_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = timeline_path(dir.path());
    assert!(path.ends_with("project.timeline"));

    let original = edited_timeline();
    TimelineDocument::new(original.clone())
        .save_to_file(&path)
        .unwrap();
    let loaded = TimelineDocument::load_from_file(&path).unwrap();
    assert_timelines_match(&original, &loaded.timeline);

    // Saving again over an existing document replaces it.
    let mut smaller = loaded.into_timeline();
    smaller.clear();
    TimelineDocument::new(smaller).save_to_file(&path).unwrap();
    let reloaded = TimelineDocument::load_from_file(&path).unwrap();
    assert_eq!(reloaded.timeline.track_count(), 0);
    assert_eq!(reloaded.timeline.duration(), 0.0);
}

#[test]
fn missing_or_corrupt_document_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = timeline_path(dir.path());

    let err = TimelineDocument::load_from_file(&path).unwrap_err();
    assert!(matches!(err, DoubleClipsError::Io(_)));
    assert_eq!(TimelineDocument::load_or_default(&path).timeline.track_count(), 0);

    std::fs::write(&path, br#"{"tracks": [{"clips": [{"type": "HOLOGRAM"}]}]}"#).unwrap();
    let err = TimelineDocument::load_from_file(&path).unwrap_err();
    assert!(matches!(err, DoubleClipsError::Decode(_)));
    assert_eq!(TimelineDocument::load_or_default(&path).timeline.track_count(), 0);
}

#[test]
fn settings_document_lives_beside_the_timeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE_NAME);
    let settings = VideoSettings {
        frame_rate: 60,
        ..VideoSettings::default()
    };
    std::fs::write(&path, settings.to_json().unwrap()).unwrap();

    let loaded = VideoSettings::from_json(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(loaded, settings);
}

// ── Documents from the mobile editor ───────────────────────────

const EDITOR_DOCUMENT: &str = r#"{
  "tracks": [
    {
      "timelineIndex": 0,
      "clips": [
        {
          "type": "VIDEO",
          "clipName": "IMG_0042.mp4",
          "startTime": 0.0,
          "duration": 4.0,
          "startClipTrim": 1.0,
          "endClipTrim": 3.0,
          "originalDuration": 8.0,
          "trackIndex": 0,
          "width": 1080,
          "height": 1920,
          "videoProperties": {
            "valuePosX": 0.0, "valuePosY": 0.0, "valueRot": 0.0,
            "valueScaleX": 1.0, "valueScaleY": 1.0, "valueOpacity": 1.0,
            "valueSpeed": 1.0, "valueHue": 0.0, "valueSaturation": 1.0,
            "valueBrightness": 0.0, "valueTemperature": 6500.0
          },
          "keyframes": {
            "keyframes": [
              {"time": 0.0, "value": {"valueOpacity": 0.0}, "easing": "EASE_IN_OUT_CUBIC"},
              {"time": 1.0, "value": {"valueOpacity": 1.0}, "easing": "LINEAR"}
            ]
          },
          "endTransition": {
            "trackIndex": 0,
            "startTime": 3.5,
            "duration": 0.5,
            "effect": {"type": "transition", "style": "fade", "duration": 0.5, "offset": 0.0},
            "mode": "OVERLAP"
          },
          "endTransitionEnabled": true,
          "isClipHasAudio": true,
          "isMute": false,
          "isLockedForTemplate": false,
          "isReverse": false
        },
        {
          "type": "IMAGE",
          "clipName": "sticker.png",
          "startTime": 4.0,
          "duration": 2.5,
          "trackIndex": 0
        }
      ]
    },
    {
      "timelineIndex": 1,
      "clips": [
        {
          "type": "EFFECT",
          "clipName": "glitch",
          "startTime": 1.0,
          "duration": 1.0,
          "trackIndex": 1,
          "effect": {"style": "glitch", "duration": 1.0, "offset": 0.0}
        }
      ]
    }
  ],
  "duration": 6.5
}"#;

#[test]
fn reads_editor_document() {
    let doc = TimelineDocument::from_json(EDITOR_DOCUMENT.as_bytes()).unwrap();
    assert!(doc.repairs.is_clean());

    let timeline = &doc.timeline;
    assert_eq!(timeline.track_count(), 2);
    assert_eq!(timeline.duration(), 6.5);

    let video = &timeline.track(0).unwrap().clips()[0];
    assert_eq!(video.clip_type, ClipType::Video);
    assert_eq!(video.source_range().start, 1.0);
    assert!(!video.exceeds_source());
    let transition = video.end_transition.as_ref().unwrap();
    assert_eq!(transition.mode, TransitionMode::Overlap);
    assert_eq!(transition.effect.kind.as_deref(), Some("transition"));

    // Keyframe values omit fields; those take their defaults.
    let halfway = video.properties_at(0.5);
    assert_close(halfway.value_opacity, 0.5, "opacity at midpoint");
    assert_eq!(halfway.value_scale_x, 1.0);

    let image = &timeline.track(0).unwrap().clips()[1];
    assert_eq!(image.clip_type, ClipType::Image);
    assert!(!image.end_transition_enabled);
    assert_eq!(image.video_properties, VideoProperties::default());

    let effect = &timeline.track(1).unwrap().clips()[0];
    assert_eq!(effect.effect.as_ref().unwrap().style, "glitch");
    assert!(effect.effect.as_ref().unwrap().kind.is_none());
}

#[test]
fn editor_document_rewrites_with_same_keys() {
    let doc = TimelineDocument::from_json(EDITOR_DOCUMENT.as_bytes()).unwrap();
    let written: serde_json::Value = serde_json::from_slice(&doc.to_json().unwrap()).unwrap();
    let source: serde_json::Value = serde_json::from_str(EDITOR_DOCUMENT).unwrap();

    let a = &written["tracks"][0]["clips"][0];
    let b = &source["tracks"][0]["clips"][0];
    let mut written_keys: Vec<_> = a.as_object().unwrap().keys().cloned().collect();
    let mut source_keys: Vec<_> = b.as_object().unwrap().keys().cloned().collect();
    written_keys.sort();
    source_keys.sort();
    assert_eq!(written_keys, source_keys);
    assert_eq!(a["keyframes"]["keyframes"][0]["easing"], "EASE_IN_OUT_CUBIC");
    assert_eq!(a["endTransition"]["mode"], "OVERLAP");
}

#[test]
fn editor_document_with_bad_indices_is_repaired() {
    let mut value: serde_json::Value = serde_json::from_str(EDITOR_DOCUMENT).unwrap();
    value["tracks"][1]["timelineIndex"] = 7.into();
    value["tracks"][1]["clips"][0]["trackIndex"] = 4.into();
    value["duration"] = 1.0.into();
    let bytes = serde_json::to_vec(&value).unwrap();

    let doc = TimelineDocument::from_json(&bytes).unwrap();
    assert_eq!(doc.repairs.indices_fixed, 2);
    assert_eq!(doc.repairs.stale_duration, Some(1.0));
    assert_eq!(doc.timeline.duration(), 6.5);
    let track = doc.timeline.track(1).unwrap();
    assert_eq!(track.timeline_index(), 1);
    assert_eq!(track.clips()[0].track_index(), 1);
}
