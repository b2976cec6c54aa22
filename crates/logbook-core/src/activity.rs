//! Activities: one workout performed on a logbook entry's date.

use serde::{Deserialize, Serialize};

use crate::changes::{ChangeSummary, ReconcilePolicy, apply_changes};
use crate::children::OwnedChildren;
use crate::comment::{Comment, CommentDto};
use crate::error::{CoreError, Result};
use crate::id::Identity;
use crate::time::Timestamp;
use crate::units::{ActivityType, DistanceUnits, DurationUnits};
use crate::version::VersionToken;

/// Kind-specific measurements. The variant is fixed when the activity is
/// created; updates must carry the same variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "kind",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum ActivityKind {
    StrengthTraining,
    UnmonitoredAerobic {
        distance: f64,
        distance_units: DistanceUnits,
    },
    MonitoredAerobic {
        distance: f64,
        distance_units: DistanceUnits,
        average_watts: f64,
        total_calories: f64,
        average_heart_rate: f64,
    },
}

impl ActivityKind {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::StrengthTraining => "STRENGTH_TRAINING",
            Self::UnmonitoredAerobic { .. } => "UNMONITORED_AEROBIC",
            Self::MonitoredAerobic { .. } => "MONITORED_AEROBIC",
        }
    }

    pub fn same_kind_as(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Distance in meters, for aerobic kinds.
    pub fn distance_meters(&self) -> Option<f64> {
        match self {
            Self::StrengthTraining => None,
            Self::UnmonitoredAerobic {
                distance,
                distance_units,
            }
            | Self::MonitoredAerobic {
                distance,
                distance_units,
                ..
            } => Some(distance * distance_units.meters()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    id: Option<Identity>,
    activity_type: ActivityType,
    duration: f64,
    duration_units: DurationUnits,
    version: VersionToken,
    details: Option<String>,
    logbook_entry: Option<Identity>,
    comments: OwnedChildren<Comment>,
    kind: ActivityKind,
}

impl Activity {
    /// Builds an unsaved activity from a client descriptor, picking the kind
    /// from the descriptor's tag.
    pub fn new_for(dto: &ActivityDto, policy: &ReconcilePolicy) -> Result<Self> {
        let mut activity = Self {
            id: None,
            activity_type: dto.activity_type,
            duration: 0.0,
            duration_units: dto.duration_units,
            version: VersionToken::initial(),
            details: None,
            logbook_entry: None,
            comments: OwnedChildren::new(),
            kind: dto.kind.clone(),
        };
        activity.update_from(dto, policy)?;
        activity.version = VersionToken::initial();
        Ok(activity)
    }

    /// Applies a client descriptor, reconciling comments by identity.
    ///
    /// Nothing is modified when the descriptor is rejected.
    pub fn update_from(
        &mut self,
        dto: &ActivityDto,
        policy: &ReconcilePolicy,
    ) -> Result<ChangeSummary> {
        if !self.kind.same_kind_as(&dto.kind) {
            return Err(CoreError::ActivityKindMismatch {
                current: self.kind.tag(),
                requested: dto.kind.tag(),
            });
        }
        validate_duration(dto.duration)?;

        let summary = apply_changes("activity", &mut self.comments, &dto.comments, policy)?;

        if let Some(version) = dto.version {
            self.version = version;
        }
        self.details = dto.activity_details.clone();
        self.activity_type = dto.activity_type;
        self.duration = dto.duration;
        self.duration_units = dto.duration_units;
        self.kind = dto.kind.clone();
        Ok(summary)
    }

    pub fn set_valid_duration(&mut self, duration: f64, units: DurationUnits) -> Result<()> {
        validate_duration(duration)?;
        self.duration = duration;
        self.duration_units = units;
        Ok(())
    }

    pub fn as_dto(&self) -> ActivityDto {
        ActivityDto {
            id: self.id.map(Identity::get),
            activity_type: self.activity_type,
            duration_units: self.duration_units,
            duration: self.duration,
            version: Some(self.version),
            activity_details: self.details.clone(),
            comments: self.comments.iter().map(Comment::as_dto).collect(),
            kind: self.kind.clone(),
        }
    }

    pub fn id(&self) -> Option<Identity> {
        self.id
    }

    pub fn activity_type(&self) -> ActivityType {
        self.activity_type
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn duration_units(&self) -> DurationUnits {
        self.duration_units
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration * self.duration_units.seconds()
    }

    pub fn version(&self) -> VersionToken {
        self.version
    }

    pub fn set_version(&mut self, version: VersionToken) {
        self.version = version;
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    pub fn kind(&self) -> &ActivityKind {
        &self.kind
    }

    pub fn comments(&self) -> &OwnedChildren<Comment> {
        &self.comments
    }

    pub fn comments_mut(&mut self) -> &mut OwnedChildren<Comment> {
        &mut self.comments
    }

    pub fn logbook_entry(&self) -> Option<Identity> {
        self.logbook_entry
    }

    pub fn set_logbook_entry(&mut self, entry: Identity) {
        self.logbook_entry = Some(entry);
    }

    pub fn belongs_to(&self, entry: Identity) -> bool {
        self.logbook_entry == Some(entry)
    }

    pub fn mark_persisted(&mut self, identity: Identity, _now: Timestamp) {
        self.id = Some(identity);
    }
}

fn validate_duration(duration: f64) -> Result<()> {
    if duration.is_finite() && duration >= 0.0 {
        Ok(())
    } else {
        Err(CoreError::InvalidDuration(duration))
    }
}

/// Wire form of an [`Activity`], also used as its update descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub activity_type: ActivityType,
    pub duration_units: DurationUnits,
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_details: Option<String>,
    #[serde(default)]
    pub comments: Vec<CommentDto>,
    #[serde(flatten)]
    pub kind: ActivityKind,
}

impl ActivityDto {
    pub fn new(
        activity_type: ActivityType,
        duration: f64,
        duration_units: DurationUnits,
        kind: ActivityKind,
    ) -> Self {
        Self {
            id: None,
            activity_type,
            duration_units,
            duration,
            version: None,
            activity_details: None,
            comments: Vec::new(),
            kind,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.activity_details = Some(details.into());
        self
    }

    #[must_use]
    pub fn with_comments(mut self, comments: Vec<CommentDto>) -> Self {
        self.comments = comments;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::children::{CollectionEntry, PersistentChild};
    use crate::time::now_utc;

    fn rowing() -> ActivityDto {
        ActivityDto::new(
            ActivityType::Rowing,
            30.0,
            DurationUnits::Minutes,
            ActivityKind::MonitoredAerobic {
                distance: 6.5,
                distance_units: DistanceUnits::Kilometers,
                average_watts: 180.0,
                total_calories: 420.0,
                average_heart_rate: 142.0,
            },
        )
        .with_details("steady state")
    }

    fn lifting() -> ActivityDto {
        ActivityDto::new(
            ActivityType::WeightTraining,
            45.0,
            DurationUnits::Minutes,
            ActivityKind::StrengthTraining,
        )
    }

    #[test]
    fn test_new_for_picks_kind_from_tag() {
        let activity = Activity::new_for(&rowing(), &ReconcilePolicy::default()).unwrap();
        assert_eq!(activity.kind().tag(), "MONITORED_AEROBIC");
        assert_eq!(activity.details(), Some("steady state"));
        assert_eq!(activity.duration_seconds(), 1800.0);
        assert_eq!(activity.kind().distance_meters(), Some(6500.0));
        assert_eq!(activity.id(), None);
    }

    #[test]
    fn test_new_for_keeps_comments_pending() {
        let dto = lifting().with_comments(vec![CommentDto::new("felt strong")]);
        let activity = Activity::new_for(&dto, &ReconcilePolicy::default()).unwrap();
        assert_eq!(activity.comments().len(), 1);
        assert_eq!(activity.comments().pending_count(), 1);
    }

    #[test]
    fn test_negative_duration_rejected() {
        let mut dto = lifting();
        dto.duration = -1.0;
        let err = Activity::new_for(&dto, &ReconcilePolicy::default()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDuration(d) if d == -1.0));
        assert!(err.is_invalid_argument());

        let mut activity = Activity::new_for(&lifting(), &ReconcilePolicy::default()).unwrap();
        assert!(
            activity
                .set_valid_duration(f64::NAN, DurationUnits::Seconds)
                .is_err()
        );
        assert_eq!(activity.duration(), 45.0);
    }

    #[test]
    fn test_kind_change_rejected_without_side_effects() {
        let mut activity = Activity::new_for(&rowing(), &ReconcilePolicy::default()).unwrap();
        let before = activity.clone();

        let err = activity
            .update_from(&lifting(), &ReconcilePolicy::default())
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::ActivityKindMismatch {
                current: "MONITORED_AEROBIC",
                requested: "STRENGTH_TRAINING"
            }
        ));
        assert_eq!(activity, before);
    }

    #[test]
    fn test_update_reconciles_comments_and_fields() {
        let dto = lifting().with_comments(vec![CommentDto::new("a"), CommentDto::new("b")]);
        let mut activity = Activity::new_for(&dto, &ReconcilePolicy::default()).unwrap();
        let mut next = 0;
        activity.comments_mut().stamp_persisted(
            None,
            || {
                next += 1;
                Identity::from_raw(next).unwrap()
            },
            now_utc(),
        );

        let mut update = activity.as_dto();
        update.duration = 50.0;
        update.comments.remove(0);
        update.comments.push(CommentDto::new("c"));

        let summary = activity
            .update_from(&update, &ReconcilePolicy::default())
            .unwrap();
        assert_eq!(summary.removed, 1);
        assert_eq!(summary.added, 1);
        assert_eq!(activity.duration(), 50.0);
        let contents: Vec<_> = activity.comments().iter().map(Comment::content).collect();
        assert_eq!(contents, vec!["b", "c"]);
        assert!(activity.comments().iter().next().unwrap().identity().is_some());
    }

    #[test]
    fn test_update_overwrites_version_from_descriptor() {
        let mut activity = Activity::new_for(&lifting(), &ReconcilePolicy::default()).unwrap();
        let mut update = activity.as_dto();
        update.version = Some(VersionToken::new(9));
        activity
            .update_from(&update, &ReconcilePolicy::default())
            .unwrap();
        assert_eq!(activity.version(), VersionToken::new(9));
    }

    #[test]
    fn test_back_reference() {
        let mut activity = Activity::new_for(&lifting(), &ReconcilePolicy::default()).unwrap();
        let entry = Identity::from_raw(3).unwrap();
        assert!(!activity.belongs_to(entry));
        activity.set_logbook_entry(entry);
        assert!(activity.belongs_to(entry));
        assert_eq!(activity.logbook_entry(), Some(entry));
    }

    #[test]
    fn test_dto_wire_format() {
        let json = serde_json::to_value(rowing()).unwrap();
        assert_eq!(json["kind"], "MONITORED_AEROBIC");
        assert_eq!(json["activityType"], "ROWING");
        assert_eq!(json["distanceUnits"], "KILOMETERS");
        assert_eq!(json["averageHeartRate"], 142.0);

        let back: ActivityDto = serde_json::from_value(json).unwrap();
        assert_eq!(back, rowing());
    }

    #[test]
    fn test_dto_parses_strength_training() {
        let dto: ActivityDto = serde_json::from_str(
            r#"{
                "kind": "STRENGTH_TRAINING",
                "activityType": "WEIGHT_TRAINING",
                "durationUnits": "MINUTES",
                "duration": 20,
                "comments": [{"content": "legs"}]
            }"#,
        )
        .unwrap();
        assert_eq!(dto.kind, ActivityKind::StrengthTraining);
        assert_eq!(dto.comments.len(), 1);
        assert_eq!(dto.version, None);
    }

    #[test]
    fn test_persisted_comment_version_survives_as_dto() {
        let dto = lifting().with_comments(vec![CommentDto::new("a")]);
        let mut activity = Activity::new_for(&dto, &ReconcilePolicy::default()).unwrap();
        activity
            .comments_mut()
            .stamp_persisted(None, || Identity::from_raw(1).unwrap(), now_utc());
        let comment = activity.comments().iter().next().unwrap();
        assert_eq!(
            activity.as_dto().comments[0].version,
            Some(PersistentChild::version(comment))
        );
    }
}
