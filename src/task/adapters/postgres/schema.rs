//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Storage-assigned task identifier.
        id -> Int8,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional description.
        #[max_length = 1000]
        description -> Nullable<Varchar>,
        /// Workflow status.
        #[max_length = 50]
        status -> Varchar,
        /// Priority label.
        #[max_length = 20]
        priority -> Varchar,
        /// Remote resource identifier used for enrichment.
        external_id -> Nullable<Int8>,
        /// Serialized enrichment snapshot.
        external_api_data -> Nullable<Text>,
        /// Owner tag.
        #[max_length = 100]
        user_id -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Completion timestamp.
        completed_at -> Nullable<Timestamptz>,
    }
}
