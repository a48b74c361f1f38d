use almanac_client::{DocCoords, Overview};
use chrono::DateTime;
use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;
use crate::calendar::WeekCalendar;

fn renderer() -> (PreviewRenderer, mpsc::UnboundedReceiver<OutboundMessage>) {
	let (tx, rx) = mpsc::unbounded_channel();
	(PreviewRenderer::new(Box::new(WeekCalendar::new()), tx).with_date_format("%Y-%m-%d"), rx)
}

fn moment(name: &str, work_state: WorkState, line: u32) -> Moment {
	Moment {
		name: name.into(),
		work_state,
		doc_coords: DocCoords { line_number: line },
	}
}

fn instance(name: &str, end: &str, line: u32) -> Instance {
	Instance {
		name: name.into(),
		end: DateTime::parse_from_rfc3339(end).unwrap(),
		origin_doc_coords: DocCoords { line_number: line },
	}
}

fn payload_with_lanes(categories: Vec<Category>) -> PreviewPayload {
	PreviewPayload {
		overview: Overview { categories },
		..PreviewPayload::default()
	}
}

fn lane_columns(lane: &Node) -> Vec<String> {
	let table = lane.as_element().unwrap().element_children().find(|e| e.tag == "table").unwrap();
	let body = table.element_children().nth(1).unwrap();
	body.element_children().map(|td| Node::Element(td.clone()).text_content()).collect()
}

fn cells(node: &Node) -> Vec<&Element> {
	let mut found = Vec::new();
	node.find_by_class("moment-cell", &mut found);
	found
}

#[test]
fn test_uncategorized_lane_is_headerless() {
	let (mut r, _rx) = renderer();
	r.update(&payload_with_lanes(vec![Category {
		name: almanac_client::NO_CATEGORY.into(),
		moments: vec![moment("A", WorkState::New, 0)],
	}]));

	let lanes = &r.fragments().overview;
	assert_eq!(lanes.len(), 1);
	let lane = lanes[0].as_element().unwrap();
	assert!(lane.element_children().all(|e| e.tag != "h3"));
	assert_eq!(lane_columns(&lanes[0]), vec!["A", "", ""]);
}

#[test]
fn test_named_lane_has_heading_and_columns() {
	let (mut r, _rx) = renderer();
	r.update(&payload_with_lanes(vec![Category {
		name: "work".into(),
		moments: vec![
			moment("write report", WorkState::InProgress, 3),
			moment("call bob", WorkState::Waiting, 4),
			moment("plan trip", WorkState::New, 5),
			moment("file taxes", WorkState::New, 6),
		],
	}]));

	let lane = &r.fragments().overview[0];
	let heading = lane.as_element().unwrap().element_children().next().unwrap();
	assert_eq!(heading.tag, "h3");
	assert_eq!(Node::Element(heading.clone()).text_content(), "work");
	assert_eq!(lane_columns(lane), vec!["plan tripfile taxes", "call bob", "write report"]);

	let header = lane.to_html();
	assert!(header.contains("<th>New</th><th>Waiting</th><th>In Progress</th>"));
}

#[test]
fn test_unknown_work_state_is_omitted() {
	let (mut r, _rx) = renderer();
	r.update(&payload_with_lanes(vec![Category {
		name: "home".into(),
		moments: vec![moment("mystery", WorkState::Unknown, 1), moment("dishes", WorkState::Waiting, 2)],
	}]));

	let lane = &r.fragments().overview[0];
	assert_eq!(lane_columns(lane), vec!["", "dishes", ""]);
	assert_eq!(cells(lane).len(), 1);
}

#[test]
fn test_click_on_moment_cell_emits_single_jump() {
	let (mut r, mut rx) = renderer();
	r.update(&payload_with_lanes(vec![Category {
		name: "work".into(),
		moments: vec![moment("B", WorkState::New, 42)],
	}]));

	let id = cells(&r.fragments().overview[0])[0].id.unwrap();
	assert!(r.click(id));

	assert_eq!(rx.try_recv().unwrap(), OutboundMessage::JumpToLine { line: 42 });
	assert!(rx.try_recv().is_err());
}

#[test]
fn test_click_on_stale_element_is_ignored() {
	let (mut r, mut rx) = renderer();
	r.update(&payload_with_lanes(vec![Category {
		name: "work".into(),
		moments: vec![moment("B", WorkState::New, 42), moment("C", WorkState::New, 43)],
	}]));
	r.update(&PreviewPayload::default());

	assert!(!r.click(ElementId(1)));
	assert!(rx.try_recv().is_err());
}

#[test]
fn test_today_and_week_lists() {
	let (mut r, mut rx) = renderer();
	let payload = PreviewPayload {
		today: vec![instance("pay rent", "2024-03-04T12:00:00+00:00", 7)],
		week: vec![instance("dentist", "2024-03-06T12:00:00+00:00", 9)],
		..PreviewPayload::default()
	};
	r.update(&payload);

	let today = &r.fragments().due_today;
	assert_eq!(today.len(), 1);
	assert_eq!(today[0].text_content(), "pay rent");
	assert!(today[0].as_element().unwrap().has_class("due-today"));

	let week = &r.fragments().due_week;
	assert_eq!(week[0].text_content(), "dentist (2024-03-06)");
	assert!(week[0].as_element().unwrap().has_class("due-week"));

	assert!(r.click(week[0].as_element().unwrap().id.unwrap()));
	assert_eq!(rx.try_recv().unwrap(), OutboundMessage::JumpToLine { line: 9 });
}

#[test]
fn test_bad_date_format_falls_back_to_rfc3339() {
	let (tx, _rx) = mpsc::unbounded_channel();
	let mut r = PreviewRenderer::new(Box::new(WeekCalendar::new()), tx).with_date_format("%Q");
	let dentist = instance("dentist", "2024-03-06T12:00:00+00:00", 9);
	let expected = format!("dentist ({})", dentist.end.with_timezone(&Local).to_rfc3339());

	r.update(&PreviewPayload {
		week: vec![dentist],
		..PreviewPayload::default()
	});

	assert_eq!(r.fragments().due_week[0].text_content(), expected);
}

#[test]
fn test_date_format_validation() {
	assert!(is_valid_date_format(DEFAULT_DATE_FORMAT));
	assert!(is_valid_date_format("%d.%m."));
	assert!(!is_valid_date_format("%Q"));
}

#[test]
fn test_update_replaces_everything() {
	let (mut r, _rx) = renderer();
	r.update(&PreviewPayload {
		today: vec![instance("a", "2024-03-04T12:00:00+00:00", 1)],
		..payload_with_lanes(vec![Category {
			name: "x".into(),
			moments: vec![moment("m", WorkState::New, 2)],
		}])
	});
	r.update(&PreviewPayload::default());

	assert_eq!(r.fragments(), &Fragments::default());
	assert_eq!(r.target_line(ElementId(0)), None);
}

#[test]
fn test_calendar_refetched_on_update() {
	let (mut r, _rx) = renderer();
	r.update(&PreviewPayload {
		calendar: vec![json!({"title": "standup", "start": "2024-03-04", "end": "2024-03-05"})],
		..PreviewPayload::default()
	});
	assert_eq!(r.calendar_nodes().len(), 1);

	r.update(&PreviewPayload::default());
	assert!(r.calendar_nodes().is_empty());
}

#[test]
fn test_handle_update_message() {
	let (mut r, _rx) = renderer();
	r.handle(InboundMessage::Update {
		preview: payload_with_lanes(vec![Category {
			name: "x".into(),
			moments: vec![moment("m", WorkState::New, 2)],
		}]),
	});
	assert_eq!(r.fragments().overview.len(), 1);
}

#[test]
fn test_alert_posts_message() {
	let (r, mut rx) = renderer();
	assert!(r.alert("boom"));
	assert_eq!(rx.try_recv().unwrap(), OutboundMessage::Alert { text: "boom".into() });
}
