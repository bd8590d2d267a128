//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Player accounts. `bank` carries a `CHECK (bank >= 0)` constraint.
    users (id) {
        id -> Uuid,
        username -> Varchar,
        email -> Varchar,
        bank -> Int8,
        awards -> Int4,
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Hero catalogue.
    heroes (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Text,
        rarity -> Text,
        damage_type -> Text,
        effect -> Text,
        hitpoint -> Int4,
        damage -> Int4,
        cost -> Int4,
        damage_tower -> Int4,
        speed -> Int4,
        price -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Spell catalogue.
    spells (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Text,
        area -> Int4,
        damage_type -> Text,
        damage -> Int4,
        duration -> Int8,
        effect -> Text,
        price -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Hero ownership facts, one row per (user, hero).
    user_heroes (user_id, hero_id) {
        user_id -> Uuid,
        hero_id -> Uuid,
        acquired_at -> Timestamptz,
    }
}

diesel::table! {
    /// Spell ownership facts, one row per (user, spell).
    user_spells (user_id, spell_id) {
        user_id -> Uuid,
        spell_id -> Uuid,
        acquired_at -> Timestamptz,
    }
}

diesel::table! {
    /// Decks; the owner is fixed at creation.
    decks (id) {
        id -> Uuid,
        user_id -> Uuid,
        name -> Varchar,
        description -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Heroes slotted into decks.
    deck_heroes (deck_id, hero_id) {
        deck_id -> Uuid,
        hero_id -> Uuid,
        added_at -> Timestamptz,
    }
}

diesel::table! {
    /// Spells slotted into decks.
    deck_spells (deck_id, spell_id) {
        deck_id -> Uuid,
        spell_id -> Uuid,
        added_at -> Timestamptz,
    }
}

diesel::joinable!(user_heroes -> users (user_id));
diesel::joinable!(user_heroes -> heroes (hero_id));
diesel::joinable!(user_spells -> users (user_id));
diesel::joinable!(user_spells -> spells (spell_id));
diesel::joinable!(decks -> users (user_id));
diesel::joinable!(deck_heroes -> decks (deck_id));
diesel::joinable!(deck_heroes -> heroes (hero_id));
diesel::joinable!(deck_spells -> decks (deck_id));
diesel::joinable!(deck_spells -> spells (spell_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    heroes,
    spells,
    user_heroes,
    user_spells,
    decks,
    deck_heroes,
    deck_spells,
);
