// Lanes schema - board tables for Diesel ORM

diesel::table! {
    statuses (id) {
        id -> Text,
        title -> Text,
    }
}

diesel::table! {
    contexts (id) {
        id -> Text,
        title -> Text,
        color -> Text,
    }
}

diesel::table! {
    tasks (id) {
        id -> Text,
        title -> Text,
        status -> Text,
        context -> Text,
        tags -> Text,
        color -> Nullable<Text>,
        #[sql_name = "order"]
        sort_order -> Integer,
    }
}

diesel::allow_tables_to_appear_in_same_query!(statuses, contexts, tasks,);
