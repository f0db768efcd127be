//! Frontend Models
//!
//! View helpers over the board snapshot types.

use dropbins_core::{ContainerSnapshot, GradeMark, ItemSnapshot, Purpose};

/// CSS classes of a container panel
pub fn container_class(container: &ContainerSnapshot, is_target: bool) -> String {
    let mut c = format!("container {}", container.purpose.as_str());
    if !container.enabled { c.push_str(" disabled"); }
    if container.drop_candidate || is_target { c.push_str(" drop-target"); }
    c
}

/// CSS classes of an item card; declared classes come first
pub fn item_class(item: &ItemSnapshot, is_dragging: bool) -> String {
    let mut c = String::from("item-card");
    for class in &item.classes {
        c.push(' ');
        c.push_str(class);
    }
    match item.grade {
        Some(GradeMark::Correct) => c.push_str(" correct"),
        Some(GradeMark::Incorrect) => c.push_str(" incorrect"),
        Some(GradeMark::Hinted) => c.push_str(" hinted"),
        None => {}
    }
    if item.disabled { c.push_str(" locked"); }
    if !item.draggable { c.push_str(" frozen"); }
    if is_dragging { c.push_str(" dragging"); }
    c
}

/// Heading shown above a container, e.g. "Answers (1/3)"
pub fn container_caption(container: &ContainerSnapshot) -> String {
    let name = match container.purpose {
        Purpose::Source => "Pool",
        Purpose::Destination => "Answers",
        Purpose::Trashcan => "Trash",
    };
    match (container.purpose, container.cardinality_limit) {
        (Purpose::Destination, Some(limit)) => format!("{} ({}/{})", name, container.items.len(), limit),
        _ => name.to_string(),
    }
}

/// The drag in flight picked up this item, as itself or as a clone source
pub fn is_dragging_item(item_id: &str, candidate: Option<&str>, original: Option<&str>) -> bool {
    candidate == Some(item_id) || original == Some(item_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropbins_core::Origin;
    use pretty_assertions::assert_eq;

    fn make_item(id: &str) -> ItemSnapshot {
        ItemSnapshot {
            id: id.to_string(),
            owner: "D".to_string(),
            tag: "div".to_string(),
            classes: vec!["chip".to_string()],
            component: None,
            origin_id: None,
            source_of_origin: Origin::Destination,
            draggable: true,
            disabled: false,
            grade: None,
            children: Vec::new(),
        }
    }

    fn make_container(purpose: Purpose, limit: Option<usize>) -> ContainerSnapshot {
        ContainerSnapshot {
            id: "D".to_string(),
            group: "g1".to_string(),
            purpose,
            enabled: true,
            drop_candidate: false,
            cardinality_limit: limit,
            overflow_limit: None,
            items: vec![make_item("a")],
        }
    }

    #[test]
    fn test_item_class() {
        let mut item = make_item("a");
        assert_eq!(item_class(&item, false), "item-card chip");

        item.grade = Some(GradeMark::Correct);
        item.draggable = false;
        assert_eq!(item_class(&item, true), "item-card chip correct frozen dragging");
    }

    #[test]
    fn test_container_class_and_caption() {
        let mut container = make_container(Purpose::Destination, Some(3));
        assert_eq!(container_class(&container, false), "container destination");
        assert_eq!(container_caption(&container), "Answers (1/3)");

        container.enabled = false;
        assert_eq!(container_class(&container, true), "container destination disabled drop-target");
        assert_eq!(container_caption(&make_container(Purpose::Source, None)), "Pool");
    }

    #[test]
    fn test_is_dragging_item() {
        assert!(is_dragging_item("x", Some("x"), Some("x")));
        // Clone candidates match through the original, whatever the separator
        assert!(is_dragging_item("x", Some("x::dbc3"), Some("x")));
        assert!(!is_dragging_item("x", Some("x_dbc3"), Some("x_y")));
        assert!(!is_dragging_item("x", None, None));
    }
}
