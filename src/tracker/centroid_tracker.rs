//! Nearest-centroid identity tracker.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::Point;
use crate::tracker::matching::{self, AssignmentResult, AssignmentStrategy, Detection};
use crate::tracker::tracked_object::{ObjectId, TrackedObject};

/// Configuration for the CentroidTracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// An object is dropped once it has gone unmatched for more than this
    /// many consecutive updates.
    pub max_disappeared: u32,
    /// Matches further apart than this (pixels) are rejected. `None` accepts
    /// any distance.
    pub max_distance: Option<f64>,
    pub assignment: AssignmentStrategy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_disappeared: 30,
            max_distance: None,
            assignment: AssignmentStrategy::Greedy,
        }
    }
}

pub struct CentroidTracker {
    objects: BTreeMap<ObjectId, TrackedObject>,
    next_object_id: ObjectId,
    config: TrackerConfig,
}

impl CentroidTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            objects: BTreeMap::new(),
            next_object_id: 0,
            config,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Start tracking a new object and return its id.
    pub fn register(&mut self, centroid: Point) -> ObjectId {
        let id = self.next_object_id;
        self.next_object_id += 1;
        self.objects.insert(id, TrackedObject::new(id, centroid));
        debug!(object_id = id, x = centroid.x, y = centroid.y, "registered object");
        id
    }

    /// Stop tracking an object. Its id is not handed out again.
    pub fn deregister(&mut self, object_id: ObjectId) -> Option<TrackedObject> {
        let removed = self.objects.remove(&object_id);
        if removed.is_some() {
            debug!(object_id, "deregistered object");
        }
        removed
    }

    /// Match this frame's detections to tracked objects.
    ///
    /// Returns the centroid of every object alive after the update, ordered
    /// by registration.
    pub fn update(&mut self, detections: &[Detection]) -> BTreeMap<ObjectId, Point> {
        if detections.is_empty() {
            let ids: Vec<ObjectId> = self.objects.keys().copied().collect();
            for id in ids {
                self.mark_missed(id);
            }
            return self.centroids();
        }

        let input_centroids: Vec<Point> = detections.iter().map(Detection::centroid).collect();

        if self.objects.is_empty() {
            for &centroid in &input_centroids {
                self.register(centroid);
            }
            return self.centroids();
        }

        let object_ids: Vec<ObjectId> = self.objects.keys().copied().collect();
        let object_centroids: Vec<Point> = self.objects.values().map(|o| o.centroid).collect();
        let dists = matching::distance_matrix(&object_centroids, &input_centroids);

        let AssignmentResult {
            matches,
            unmatched_tracks,
            unmatched_detections,
        } = matching::assign(&dists, self.config.assignment, self.config.max_distance);

        for (row, col) in matches {
            if let Some(object) = self.objects.get_mut(&object_ids[row]) {
                object.mark_seen(input_centroids[col]);
            }
        }

        for row in unmatched_tracks {
            self.mark_missed(object_ids[row]);
        }

        for col in unmatched_detections {
            self.register(input_centroids[col]);
        }

        self.centroids()
    }

    fn mark_missed(&mut self, object_id: ObjectId) {
        let Some(object) = self.objects.get_mut(&object_id) else {
            return;
        };
        if object.mark_missed() > self.config.max_disappeared {
            self.deregister(object_id);
        }
    }

    /// Centroids of all live objects, ordered by registration.
    pub fn centroids(&self) -> BTreeMap<ObjectId, Point> {
        self.objects
            .iter()
            .map(|(&id, object)| (id, object.centroid))
            .collect()
    }

    pub fn get(&self, object_id: ObjectId) -> Option<&TrackedObject> {
        self.objects.get(&object_id)
    }

    /// Live objects, ordered by registration.
    pub fn objects(&self) -> impl Iterator<Item = &TrackedObject> {
        self.objects.values()
    }

    pub(crate) fn objects_mut(&mut self) -> impl Iterator<Item = &mut TrackedObject> {
        self.objects.values_mut()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Id the next registration will receive. Also the number of objects
    /// ever registered.
    pub fn next_object_id(&self) -> ObjectId {
        self.next_object_id
    }
}

impl Default for CentroidTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::Rect;

    fn person_at(x: f32, y: f32) -> Detection {
        Detection::new(x, y, x + 40.0, y + 100.0)
    }

    #[test]
    fn test_first_frame_registers_in_input_order() {
        let mut tracker = CentroidTracker::default();
        let objects = tracker.update(&[person_at(0.0, 0.0), person_at(300.0, 0.0)]);

        let ids: Vec<_> = objects.keys().copied().collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(objects[&0], Point::new(20, 70));
        assert_eq!(objects[&1], Point::new(320, 70));
    }

    #[test]
    fn test_identity_follows_nearest_centroid() {
        let mut tracker = CentroidTracker::default();
        tracker.update(&[person_at(0.0, 0.0), person_at(300.0, 0.0)]);

        // Same two people, listed in reverse order and slightly moved.
        let objects = tracker.update(&[person_at(305.0, 2.0), person_at(4.0, 3.0)]);
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[&0], Point::new(24, 73));
        assert_eq!(objects[&1], Point::new(325, 72));
    }

    #[test]
    fn test_register_and_deregister() {
        let mut tracker = CentroidTracker::default();
        let a = tracker.register(Point::new(1, 1));
        let b = tracker.register(Point::new(2, 2));
        assert_eq!((a, b), (0, 1));

        assert!(tracker.deregister(a).is_some());
        assert!(tracker.deregister(a).is_none());
        assert_eq!(tracker.register(Point::new(3, 3)), 2);
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_empty_updates_age_out_objects() {
        let mut tracker = CentroidTracker::new(TrackerConfig {
            max_disappeared: 3,
            ..Default::default()
        });
        tracker.update(&[person_at(0.0, 0.0)]);

        for expected in 1..=3 {
            let objects = tracker.update(&[]);
            assert_eq!(objects.len(), 1);
            assert_eq!(tracker.get(0).map(|o| o.disappeared_count), Some(expected));
        }

        assert!(tracker.update(&[]).is_empty());
        assert_eq!(tracker.next_object_id(), 1);
    }

    #[test]
    fn test_match_resets_disappeared_count() {
        let mut tracker = CentroidTracker::default();
        tracker.update(&[person_at(0.0, 0.0)]);
        tracker.update(&[]);
        tracker.update(&[]);
        assert_eq!(tracker.get(0).map(|o| o.disappeared_count), Some(2));

        tracker.update(&[person_at(2.0, 0.0)]);
        assert_eq!(tracker.get(0).map(|o| o.disappeared_count), Some(0));
    }

    #[test]
    fn test_unmatched_object_ages_while_others_match() {
        let mut tracker = CentroidTracker::new(TrackerConfig {
            max_disappeared: 1,
            ..Default::default()
        });
        tracker.update(&[person_at(0.0, 0.0), person_at(500.0, 0.0)]);

        tracker.update(&[person_at(1.0, 0.0)]);
        assert_eq!(tracker.get(1).map(|o| o.disappeared_count), Some(1));

        let objects = tracker.update(&[person_at(2.0, 0.0)]);
        assert_eq!(objects.keys().copied().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_extra_detection_registers_new_object() {
        let mut tracker = CentroidTracker::default();
        tracker.update(&[person_at(100.0, 100.0)]);

        // Both boxes are nearest to object 0; the closer one keeps the id.
        let objects = tracker.update(&[person_at(130.0, 100.0), person_at(102.0, 100.0)]);
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[&0], Point::new(122, 170));
        assert_eq!(objects[&1], Point::new(150, 170));
    }

    #[test]
    fn test_distance_gate_registers_far_detection() {
        let mut tracker = CentroidTracker::new(TrackerConfig {
            max_distance: Some(50.0),
            ..Default::default()
        });
        tracker.update(&[person_at(0.0, 0.0)]);

        let objects = tracker.update(&[person_at(400.0, 0.0)]);
        assert_eq!(objects.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(tracker.get(0).map(|o| o.disappeared_count), Some(1));
        assert_eq!(tracker.get(0).map(|o| o.centroid), Some(Point::new(20, 70)));
    }

    #[test]
    fn test_optimal_assignment_keeps_both_identities() {
        let mut tracker = CentroidTracker::new(TrackerConfig {
            assignment: AssignmentStrategy::Optimal,
            ..Default::default()
        });
        tracker.register(Point::new(0, 0));
        tracker.register(Point::new(10, 0));

        // Both objects are nearest to (8,0). Greedy hands it to object 1 and
        // leaves object 0 unmatched; the optimal solution pairs both.
        let objects = tracker.update(&[
            Detection::from_rect(Rect::new(8.0, 0.0, 0.0, 0.0)),
            Detection::from_rect(Rect::new(-20.0, 0.0, 0.0, 0.0)),
        ]);
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[&0], Point::new(-20, 0));
        assert_eq!(objects[&1], Point::new(8, 0));
    }
}
