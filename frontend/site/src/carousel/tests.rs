use super::*;

// Far enough apart that no call lands inside a transition.
const STEP: f64 = TRANSITION_MS + 1.0;

fn ready(len: usize) -> (Carousel, f64) {
	(Carousel::new(len, 0.0), STEP)
}

#[test]
fn test_next_wraps_around() {
	let (mut carousel, mut now) = ready(4);

	for expected in [1, 2, 3, 0] {
		assert_eq!(carousel.next(now), Some(expected));
		assert_eq!(carousel.offset_percent(), -(expected as f64 * 100.0));
		now += STEP;
	}

	assert_eq!(carousel.current(), 0);
}

#[test]
fn test_prev_wraps_around() {
	let (mut carousel, now) = ready(3);

	assert_eq!(carousel.prev(now), Some(2));
	assert_eq!(carousel.prev(now + STEP), Some(1));
}

#[test]
fn test_navigation_is_ignored_while_locked() {
	let (mut carousel, now) = ready(3);

	assert_eq!(carousel.next(now), Some(1));

	// Inside the transition nothing moves and the schedule is untouched.
	let before = carousel.clone();
	assert_eq!(carousel.next(now + 10.0), None);
	assert_eq!(carousel.prev(now + 10.0), None);
	assert_eq!(carousel.go_to(0, now + TRANSITION_MS - 1.0), None);
	assert_eq!(carousel, before);

	assert_eq!(carousel.next(now + TRANSITION_MS), Some(2));
}

#[test]
fn test_initial_render_locks() {
	let mut carousel = Carousel::new(3, 0.0);

	assert!(carousel.is_locked(0.0));
	assert_eq!(carousel.next(100.0), None);
	assert_eq!(carousel.next(TRANSITION_MS), Some(1));
}

#[test]
fn test_go_to() {
	let (mut carousel, now) = ready(3);

	assert_eq!(carousel.go_to(3, now), None);
	assert_eq!(carousel.current(), 0);
	assert_eq!(carousel.go_to(2, now), Some(2));
	assert_eq!(carousel.current(), 2);
}

#[test]
fn test_auto_advance() {
	let mut carousel = Carousel::new(3, 0.0);

	assert_eq!(carousel.tick(AUTO_ADVANCE_MS - 1.0), None);
	assert_eq!(carousel.until_next_advance(1000.0), Some(AUTO_ADVANCE_MS - 1000.0));
	assert_eq!(carousel.tick(AUTO_ADVANCE_MS), Some(1));

	// Manual navigation restarts the timer.
	let now = AUTO_ADVANCE_MS + 2000.0;
	assert_eq!(carousel.next(now), Some(2));
	assert_eq!(carousel.tick(2.0 * AUTO_ADVANCE_MS), None);
	assert_eq!(carousel.tick(now + AUTO_ADVANCE_MS), Some(0));
}

#[test]
fn test_hover_pauses() {
	let mut carousel = Carousel::new(3, 0.0);

	carousel.pause();
	assert!(carousel.is_paused());
	assert_eq!(carousel.tick(AUTO_ADVANCE_MS * 3.0), None);
	assert_eq!(carousel.until_next_advance(0.0), None);

	carousel.resume(20_000.0);
	assert_eq!(carousel.tick(20_000.0 + AUTO_ADVANCE_MS - 1.0), None);
	assert_eq!(carousel.tick(20_000.0 + AUTO_ADVANCE_MS), Some(1));
}

#[test]
fn test_swipes() {
	let (mut carousel, now) = ready(3);

	carousel.touch_start(300.0);
	assert!(carousel.is_paused());
	assert_eq!(carousel.touch_end(200.0, now), Some(1));
	assert!(!carousel.is_paused());

	carousel.touch_start(100.0);
	assert_eq!(carousel.touch_end(200.0, now + STEP), Some(0));

	// Short drags only resume the auto-advance.
	carousel.touch_start(100.0);
	assert_eq!(carousel.touch_end(150.0, now + 2.0 * STEP), None);
	assert_eq!(carousel.current(), 0);
	assert!(!carousel.is_paused());
}

#[test]
fn test_keys() {
	let (mut carousel, now) = ready(3);

	assert_eq!(carousel.key("ArrowRight", now), Some(1));
	assert_eq!(carousel.key("ArrowLeft", now + STEP), Some(0));
	assert_eq!(carousel.key("Enter", now + 2.0 * STEP), None);
}

#[test]
fn test_refresh_does_not_move() {
	let (mut carousel, now) = ready(3);

	carousel.next(now);
	assert_eq!(carousel.refresh(), Some(1));
	assert_eq!(carousel.refresh(), Some(1));
	assert!(carousel.is_locked(now + 1.0));
}

#[test]
fn test_empty_carousel_is_inert() {
	let mut carousel = Carousel::new(0, 0.0);

	assert_eq!(carousel.next(STEP), None);
	assert_eq!(carousel.prev(STEP), None);
	assert_eq!(carousel.go_to(0, STEP), None);
	assert_eq!(carousel.tick(AUTO_ADVANCE_MS * 2.0), None);
	assert_eq!(carousel.key("ArrowRight", STEP), None);
	carousel.touch_start(300.0);
	assert_eq!(carousel.touch_end(0.0, STEP), None);
	assert_eq!(carousel.refresh(), None);
	assert_eq!(carousel.until_next_advance(0.0), None);
}
