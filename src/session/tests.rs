use super::*;
use std::sync::mpsc;

fn make_track() -> TrackMetadata {
    TrackMetadata {
        title: "Test Title".to_string(),
        artist: "Test Artist".to_string(),
        cover_path: Some(PathBuf::from("/tmp/music/cover.png")),
        duration_ms: 183_000,
    }
}

#[test]
fn set_track_metadata_sets_and_clears_shared_state() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, _notify_rx) = mpsc::channel::<()>();
    let handle = SessionHandle {
        state: state.clone(),
        notify: notify_tx,
    };

    let track = make_track();
    handle.set_track_metadata(Some(7), Some(&track));

    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert_eq!(s.artist, vec!["Test Artist".to_string()]);
        assert_eq!(s.length_ms, Some(183_000));
        assert_eq!(s.art_path, Some(PathBuf::from("/tmp/music/cover.png")));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/7")
        );
    }

    handle.set_track_metadata(None, None);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert!(s.artist.is_empty());
        assert_eq!(s.length_ms, None);
        assert_eq!(s.art_path, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn blank_artist_is_omitted_from_shared_state() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, _notify_rx) = mpsc::channel::<()>();
    let handle = SessionHandle {
        state: state.clone(),
        notify: notify_tx,
    };

    let track = TrackMetadata {
        artist: "   ".to_string(),
        ..make_track()
    };
    handle.set_track_metadata(Some(1), Some(&track));

    assert!(state.lock().unwrap().artist.is_empty());
}

#[test]
fn playback_status_serves_mpris_strings() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    assert_eq!(iface.playback_status(), "Paused");

    {
        let mut s = state.lock().unwrap();
        s.playback = PlaybackStatus::Playing;
    }
    assert_eq!(iface.playback_status(), "Playing");
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    {
        let mut s = state.lock().unwrap();
        s.title = Some("Title".to_string());
        s.artist = vec!["Artist".to_string()];
        s.length_ms = Some(42_000);
        s.art_path = Some(PathBuf::from("/tmp/cover.png"));
        s.track_id = ObjectPath::try_from("/org/mpris/MediaPlayer2/track/1")
            .ok()
            .map(OwnedObjectPath::from);
    }

    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "mpris:length",
        "mpris:artUrl",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn position_property_is_served_in_microseconds() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    state.lock().unwrap().position_ms = 45_000;
    assert_eq!(iface.position(), 45_000_000);
}

#[test]
fn seek_methods_convert_microseconds_to_milliseconds() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };

    let track_id = ObjectPath::try_from("/org/mpris/MediaPlayer2/track/1").unwrap();
    iface.set_position(track_id, 45_000_000);
    assert_eq!(rx.try_recv().unwrap(), ControlCmd::SeekTo(45_000));

    iface.seek(-5_000_000);
    assert_eq!(rx.try_recv().unwrap(), ControlCmd::SeekBy(-5_000));

    // Negative absolute positions are floored at zero at the edge.
    let track_id = ObjectPath::try_from("/org/mpris/MediaPlayer2/track/1").unwrap();
    iface.set_position(track_id, -1_000_000);
    assert_eq!(rx.try_recv().unwrap(), ControlCmd::SeekTo(0));
}

#[test]
fn transport_methods_forward_control_commands() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };

    iface.play_pause();
    iface.next();
    iface.previous();
    iface.stop();

    assert_eq!(rx.try_recv().unwrap(), ControlCmd::PlayPause);
    assert_eq!(rx.try_recv().unwrap(), ControlCmd::Next);
    assert_eq!(rx.try_recv().unwrap(), ControlCmd::Prev);
    assert_eq!(rx.try_recv().unwrap(), ControlCmd::Stop);
}
