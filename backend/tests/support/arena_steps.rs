//! Steps shared by the purchase and deck behaviour suites.

use rstest_bdd_macros::{given, when};

use super::arena_world::ArenaWorld;

#[given("a player with {bank} coins")]
fn a_player_with_coins(world: &ArenaWorld, bank: u64) {
    world.open_account(bank);
}

#[given("the catalogue has a hero {name} priced {price}")]
fn the_catalogue_has_a_hero(world: &ArenaWorld, name: String, price: u64) {
    world.add_hero(&name, 100, price);
}

#[given("the catalogue has a spell {name} priced {price}")]
fn the_catalogue_has_a_spell(world: &ArenaWorld, name: String, price: u64) {
    world.add_spell(&name, price);
}

#[when("the player buys the hero {name}")]
fn the_player_buys_the_hero(world: &ArenaWorld, name: String) {
    world.buy_hero(&name);
}

#[when("the player buys the spell {name}")]
fn the_player_buys_the_spell(world: &ArenaWorld, name: String) {
    world.buy_spell(&name);
}
