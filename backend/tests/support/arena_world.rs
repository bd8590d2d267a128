//! Shared world for behaviour tests driving the domain services over the
//! in-memory store.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use arena_backend::domain::ports::{CatalogQuery, DeckCommand, DeckQuery, PurchaseCommand};
use arena_backend::domain::{
    Account, Coins, Deck, DeckId, Error, ErrorCode, Hero, HeroId, HeroListing, HeroSortKey,
    ItemRef, Spell, SpellId, UserId,
};
use arena_backend::inbound::http::state::HttpState;
use arena_backend::outbound::memory::InMemoryStore;
use pagination::PageRequest;
use tokio::runtime::Runtime;

/// Scenario state: one signed-in user against a fresh store.
pub struct ArenaWorld {
    runtime: Runtime,
    pub store: Arc<InMemoryStore>,
    pub state: HttpState,
    pub user: UserId,
    heroes: RefCell<HashMap<String, HeroId>>,
    spells: RefCell<HashMap<String, SpellId>>,
    pub last_error: RefCell<Option<Error>>,
    pub last_decks: RefCell<Vec<Deck>>,
    pub history: RefCell<Vec<Vec<Deck>>>,
    pub pages: RefCell<Vec<Vec<Hero>>>,
}

impl ArenaWorld {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let state = HttpState::from_repositories(store.clone(), store.clone(), store.clone());
        Self {
            runtime: Runtime::new().expect("create runtime"),
            store,
            state,
            user: UserId::random(),
            heroes: RefCell::new(HashMap::new()),
            spells: RefCell::new(HashMap::new()),
            last_error: RefCell::new(None),
            last_decks: RefCell::new(Vec::new()),
            history: RefCell::new(Vec::new()),
            pages: RefCell::new(Vec::new()),
        }
    }

    pub fn block_on<F: std::future::Future>(&self, fut: F) -> F::Output {
        self.runtime.block_on(fut)
    }

    pub fn open_account(&self, bank: u64) {
        self.store.seed_account(Account::new(
            self.user,
            "player",
            "player@example.com",
            Coins::new(bank),
        ));
    }

    pub fn add_hero(&self, name: &str, damage: i32, price: u64) -> HeroId {
        let hero = Hero {
            id: HeroId::random(),
            name: name.to_owned(),
            description: String::new(),
            rarity: "common".to_owned(),
            damage_type: "melee".to_owned(),
            effect: String::new(),
            hitpoint: 400,
            damage,
            cost: 3,
            damage_tower: damage,
            speed: 60,
            price: Coins::new(price),
        };
        let id = hero.id;
        self.store.seed_hero(hero);
        self.heroes.borrow_mut().insert(name.to_owned(), id);
        id
    }

    pub fn add_spell(&self, name: &str, price: u64) -> SpellId {
        let spell = Spell {
            id: SpellId::random(),
            name: name.to_owned(),
            description: String::new(),
            area: 2,
            damage_type: "fire".to_owned(),
            damage: 100,
            duration: 0,
            effect: String::new(),
            price: Coins::new(price),
        };
        let id = spell.id;
        self.store.seed_spell(spell);
        self.spells.borrow_mut().insert(name.to_owned(), id);
        id
    }

    pub fn hero(&self, name: &str) -> HeroId {
        *self.heroes.borrow().get(name).expect("hero defined by scenario")
    }

    pub fn spell(&self, name: &str) -> SpellId {
        *self.spells.borrow().get(name).expect("spell defined by scenario")
    }

    pub fn grant_hero(&self, name: &str) {
        self.store.grant(self.user, ItemRef::Hero(self.hero(name)));
    }

    pub fn balance(&self) -> u64 {
        self.store
            .balance(&self.user)
            .expect("account exists")
            .amount()
    }

    fn record<T>(&self, result: Result<T, Error>) -> Option<T> {
        match result {
            Ok(value) => {
                *self.last_error.borrow_mut() = None;
                Some(value)
            }
            Err(err) => {
                *self.last_error.borrow_mut() = Some(err);
                None
            }
        }
    }

    fn record_decks(&self, result: Result<Vec<Deck>, Error>) {
        if let Some(decks) = self.record(result) {
            self.history.borrow_mut().push(decks.clone());
            *self.last_decks.borrow_mut() = decks;
        }
    }

    pub fn buy_hero(&self, name: &str) {
        let hero = self.hero(name);
        let result = self.block_on(self.state.purchases.buy_hero(&self.user, &hero));
        self.record(result);
    }

    pub fn buy_spell(&self, name: &str) {
        let spell = self.spell(name);
        let result = self.block_on(self.state.purchases.buy_spell(&self.user, &spell));
        self.record(result);
    }

    pub fn place_hero(&self, name: &str) {
        let hero = self.hero(name);
        let result = self.block_on(self.state.decks.add_hero_to_deck(&self.user, None, &hero));
        self.record_decks(result);
    }

    pub fn place_spell(&self, name: &str) {
        let spell = self.spell(name);
        let result =
            self.block_on(self.state.decks.add_spell_to_deck(&self.user, None, &spell));
        self.record_decks(result);
    }

    pub fn remove_hero(&self, deck: &DeckId, name: &str) {
        let hero = self.hero(name);
        let result =
            self.block_on(self.state.decks.delete_hero_from_deck(&self.user, deck, &hero));
        self.record_decks(result);
    }

    pub fn decks(&self) -> Vec<Deck> {
        self.block_on(self.state.decks_query.decks_for_user(&self.user))
            .expect("decks load")
    }

    pub fn owns_hero(&self, name: &str) -> bool {
        let hero = self.hero(name);
        self.block_on(self.state.catalog.owned_heroes(&self.user))
            .expect("collection loads")
            .iter()
            .any(|owned| owned.id == hero)
    }

    pub fn assert_last_error(&self, code: ErrorCode) {
        let error = self.last_error.borrow();
        let error = error.as_ref().expect("expected the last operation to fail");
        assert_eq!(error.code(), code, "unexpected error: {error:?}");
    }

    pub fn assert_last_succeeded(&self) {
        assert!(
            self.last_error.borrow().is_none(),
            "unexpected failure: {:?}",
            self.last_error.borrow()
        );
    }

    /// Walk every page of the hero listing until an empty or short page.
    pub fn list_hero_pages(&self, sort_by: &str, page_size: i64) {
        let mut pages = Vec::new();
        for page in 1.. {
            let listing = HeroListing {
                sort: HeroSortKey::parse_or_default(Some(sort_by)),
                page: PageRequest::new(Some(page), Some(page_size)),
                ..HeroListing::default()
            };
            let items = self
                .block_on(self.state.catalog.list_heroes(listing))
                .expect("listing succeeds")
                .items;
            let full = i64::try_from(items.len()).is_ok_and(|len| len == page_size);
            if !items.is_empty() {
                pages.push(items);
            }
            if !full {
                break;
            }
        }
        *self.pages.borrow_mut() = pages;
    }
}
