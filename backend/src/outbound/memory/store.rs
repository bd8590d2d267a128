//! Mutex-guarded in-memory state and its port implementations.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::domain::ports::{
    CatalogRepository, CatalogRepositoryError, DeckRepository, DeckRepositoryError,
    LedgerRepository, LedgerRepositoryError, PurchaseOrder,
};
use crate::domain::{
    Account, Coins, Deck, DeckId, DeckPlacement, DeckTarget, Hero, HeroId, HeroListing,
    HeroSortKey, ItemRef, NewDeck, SortDirection, Spell, SpellId, SpellListing, SpellSortKey,
    UserId,
};

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<UserId, Account>,
    heroes: Vec<Hero>,
    spells: Vec<Spell>,
    owned: HashSet<(UserId, ItemRef)>,
    // Creation order doubles as the "oldest first" listing order.
    decks: Vec<Deck>,
}

impl State {
    fn hero(&self, id: &HeroId) -> Option<&Hero> {
        self.heroes.iter().find(|hero| hero.id == *id)
    }

    fn spell(&self, id: &SpellId) -> Option<&Spell> {
        self.spells.iter().find(|spell| spell.id == *id)
    }

    fn price_of(&self, item: &ItemRef) -> Option<Coins> {
        match item {
            ItemRef::Hero(id) => self.hero(id).map(|hero| hero.price),
            ItemRef::Spell(id) => self.spell(id).map(|spell| spell.price),
        }
    }

    fn owns(&self, user: &UserId, item: &ItemRef) -> bool {
        self.owned.contains(&(*user, *item))
    }

    fn deck_mut(&mut self, id: &DeckId) -> Option<&mut Deck> {
        self.decks.iter_mut().find(|deck| deck.id == *id)
    }

    fn insert_deck(&mut self, new_deck: &NewDeck) -> Deck {
        let deck = Deck {
            id: DeckId::random(),
            owner: new_deck.owner,
            name: new_deck.name.clone(),
            description: new_deck.description.clone(),
            hero_ids: Vec::new(),
            spell_ids: Vec::new(),
            created_at: Utc::now(),
        };
        self.decks.push(deck.clone());
        deck
    }

    fn resolve_target(
        &mut self,
        owner: &UserId,
        target: DeckTarget,
    ) -> Result<DeckId, DeckRepositoryError> {
        match target {
            DeckTarget::Existing(id) => self
                .decks
                .iter()
                .find(|deck| deck.id == id && deck.owner == *owner)
                .map(|deck| deck.id)
                .ok_or_else(DeckRepositoryError::deck_not_found),
            DeckTarget::Default => {
                if let Some(deck) = self.decks.iter().find(|deck| deck.owner == *owner) {
                    return Ok(deck.id);
                }
                Ok(self.insert_deck(&NewDeck::default_for(*owner)).id)
            }
            DeckTarget::New => Ok(self.insert_deck(&NewDeck::default_for(*owner)).id),
        }
    }
}

/// In-memory implementation of the ledger, catalogue and deck ports.
///
/// # Examples
/// ```
/// use arena_backend::domain::{Account, Coins, UserId};
/// use arena_backend::outbound::memory::InMemoryStore;
///
/// let store = InMemoryStore::new();
/// let user = UserId::random();
/// store.seed_account(Account::new(user, "ada", "ada@example.com", Coins::new(100)));
/// assert_eq!(store.balance(&user), Some(Coins::new(100)));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, String> {
        self.state.lock().map_err(|_| {
            debug!("in-memory store lock poisoned");
            "in-memory store lock poisoned".to_owned()
        })
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut State) -> T) -> Option<T> {
        self.lock().ok().map(|mut state| f(&mut state))
    }

    /// Insert or replace an account.
    pub fn seed_account(&self, account: Account) {
        self.with_state(|state| state.accounts.insert(account.id, account));
    }

    /// Add a hero to the catalogue.
    pub fn seed_hero(&self, hero: Hero) {
        self.with_state(|state| state.heroes.push(hero));
    }

    /// Add a spell to the catalogue.
    pub fn seed_spell(&self, spell: Spell) {
        self.with_state(|state| state.spells.push(spell));
    }

    /// Record ownership without charging, as account grants do.
    pub fn grant(&self, user: UserId, item: ItemRef) {
        self.with_state(|state| state.owned.insert((user, item)));
    }

    /// Current balance of `user`.
    #[must_use]
    pub fn balance(&self, user: &UserId) -> Option<Coins> {
        self.with_state(|state| state.accounts.get(user).map(|account| account.bank))
            .flatten()
    }

    /// Number of decks owned by `user`.
    #[must_use]
    pub fn deck_count(&self, user: &UserId) -> usize {
        self.with_state(|state| state.decks.iter().filter(|deck| deck.owner == *user).count())
            .unwrap_or_default()
    }
}

fn order_by<T>(
    items: &mut [T],
    direction: SortDirection,
    id: impl Fn(&T) -> uuid::Uuid,
    key: impl Fn(&T, &T) -> Ordering,
) {
    items.sort_by(|a, b| {
        let primary = match direction {
            SortDirection::Asc => key(a, b),
            SortDirection::Desc => key(b, a),
        };
        primary.then_with(|| id(a).cmp(&id(b)))
    });
}

/// ASCII case-folded byte order, matching `lower(name)` over the `"C"`
/// collation used by the PostgreSQL schema.
fn name_order(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|byte| byte.to_ascii_lowercase())
        .cmp(b.bytes().map(|byte| byte.to_ascii_lowercase()))
}

fn page_of<T>(items: Vec<T>, offset: u64, size: u32) -> Vec<T> {
    let offset = usize::try_from(offset).unwrap_or(usize::MAX);
    let size = usize::try_from(size).unwrap_or(usize::MAX);
    items.into_iter().skip(offset).take(size).collect()
}

#[async_trait]
impl LedgerRepository for InMemoryStore {
    async fn find_account(&self, user: &UserId) -> Result<Option<Account>, LedgerRepositoryError> {
        let state = self.lock().map_err(LedgerRepositoryError::query)?;
        Ok(state.accounts.get(user).cloned())
    }

    async fn has_ownership(
        &self,
        user: &UserId,
        item: &ItemRef,
    ) -> Result<bool, LedgerRepositoryError> {
        let state = self.lock().map_err(LedgerRepositoryError::query)?;
        Ok(state.owns(user, item))
    }

    async fn purchase(&self, order: PurchaseOrder) -> Result<Coins, LedgerRepositoryError> {
        let mut state = self.lock().map_err(LedgerRepositoryError::query)?;
        let price = state
            .price_of(&order.item)
            .ok_or_else(LedgerRepositoryError::item_not_found)?;
        if price != order.price {
            return Err(LedgerRepositoryError::price_changed(order.price, price));
        }
        let bank = state
            .accounts
            .get(&order.user)
            .map(|account| account.bank)
            .ok_or_else(LedgerRepositoryError::account_not_found)?;
        if bank != order.expected_balance {
            return Err(LedgerRepositoryError::balance_changed(
                order.expected_balance,
                bank,
            ));
        }
        if state.owns(&order.user, &order.item) {
            return Err(LedgerRepositoryError::already_owned());
        }
        let remaining = bank
            .checked_sub(price)
            .ok_or_else(|| LedgerRepositoryError::insufficient_funds(bank, price))?;

        if let Some(account) = state.accounts.get_mut(&order.user) {
            account.bank = remaining;
        }
        state.owned.insert((order.user, order.item));
        Ok(remaining)
    }
}

#[async_trait]
impl CatalogRepository for InMemoryStore {
    async fn find_hero(&self, id: &HeroId) -> Result<Option<Hero>, CatalogRepositoryError> {
        let state = self.lock().map_err(CatalogRepositoryError::query)?;
        Ok(state.hero(id).cloned())
    }

    async fn find_spell(&self, id: &SpellId) -> Result<Option<Spell>, CatalogRepositoryError> {
        let state = self.lock().map_err(CatalogRepositoryError::query)?;
        Ok(state.spell(id).cloned())
    }

    async fn list_heroes(&self, listing: &HeroListing) -> Result<Vec<Hero>, CatalogRepositoryError> {
        let state = self.lock().map_err(CatalogRepositoryError::query)?;
        let mut heroes: Vec<Hero> = state
            .heroes
            .iter()
            .filter(|hero| listing.name.matches(&hero.name))
            .cloned()
            .collect();
        drop(state);

        order_by(
            &mut heroes,
            listing.direction,
            |hero| *hero.id.as_uuid(),
            |a, b| match listing.sort {
                HeroSortKey::Id => a.id.cmp(&b.id),
                HeroSortKey::Name => name_order(&a.name, &b.name),
                HeroSortKey::Damage => a.damage.cmp(&b.damage),
                HeroSortKey::Speed => a.speed.cmp(&b.speed),
            },
        );
        Ok(page_of(heroes, listing.page.offset(), listing.page.page_size()))
    }

    async fn list_spells(
        &self,
        listing: &SpellListing,
    ) -> Result<Vec<Spell>, CatalogRepositoryError> {
        let state = self.lock().map_err(CatalogRepositoryError::query)?;
        let mut spells: Vec<Spell> = state
            .spells
            .iter()
            .filter(|spell| listing.name.matches(&spell.name))
            .cloned()
            .collect();
        drop(state);

        order_by(
            &mut spells,
            listing.direction,
            |spell| *spell.id.as_uuid(),
            |a, b| match listing.sort {
                SpellSortKey::Id => a.id.cmp(&b.id),
                SpellSortKey::Name => name_order(&a.name, &b.name),
                SpellSortKey::Damage => a.damage.cmp(&b.damage),
            },
        );
        Ok(page_of(spells, listing.page.offset(), listing.page.page_size()))
    }

    async fn owned_heroes(&self, user: &UserId) -> Result<Vec<Hero>, CatalogRepositoryError> {
        let state = self.lock().map_err(CatalogRepositoryError::query)?;
        let mut heroes: Vec<Hero> = state
            .heroes
            .iter()
            .filter(|hero| state.owns(user, &ItemRef::Hero(hero.id)))
            .cloned()
            .collect();
        heroes.sort_by(|a, b| name_order(&a.name, &b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(heroes)
    }

    async fn owned_spells(&self, user: &UserId) -> Result<Vec<Spell>, CatalogRepositoryError> {
        let state = self.lock().map_err(CatalogRepositoryError::query)?;
        let mut spells: Vec<Spell> = state
            .spells
            .iter()
            .filter(|spell| state.owns(user, &ItemRef::Spell(spell.id)))
            .cloned()
            .collect();
        spells.sort_by(|a, b| name_order(&a.name, &b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(spells)
    }

    async fn insert_hero(&self, hero: &Hero) -> Result<(), CatalogRepositoryError> {
        let mut state = self.lock().map_err(CatalogRepositoryError::query)?;
        if state.hero(&hero.id).is_some() {
            return Err(CatalogRepositoryError::duplicate(hero.id.to_string()));
        }
        state.heroes.push(hero.clone());
        Ok(())
    }

    async fn insert_spell(&self, spell: &Spell) -> Result<(), CatalogRepositoryError> {
        let mut state = self.lock().map_err(CatalogRepositoryError::query)?;
        if state.spell(&spell.id).is_some() {
            return Err(CatalogRepositoryError::duplicate(spell.id.to_string()));
        }
        state.spells.push(spell.clone());
        Ok(())
    }
}

#[async_trait]
impl DeckRepository for InMemoryStore {
    async fn find_deck(&self, id: &DeckId) -> Result<Option<Deck>, DeckRepositoryError> {
        let state = self.lock().map_err(DeckRepositoryError::query)?;
        Ok(state.decks.iter().find(|deck| deck.id == *id).cloned())
    }

    async fn create_deck(&self, deck: &NewDeck) -> Result<Deck, DeckRepositoryError> {
        let mut state = self.lock().map_err(DeckRepositoryError::query)?;
        Ok(state.insert_deck(deck))
    }

    async fn decks_for_user(&self, user: &UserId) -> Result<Vec<Deck>, DeckRepositoryError> {
        let state = self.lock().map_err(DeckRepositoryError::query)?;
        Ok(state
            .decks
            .iter()
            .filter(|deck| deck.owner == *user)
            .cloned()
            .collect())
    }

    async fn place_item(&self, placement: &DeckPlacement) -> Result<DeckId, DeckRepositoryError> {
        let mut state = self.lock().map_err(DeckRepositoryError::query)?;
        if !state.owns(&placement.owner, &placement.item) {
            return Err(DeckRepositoryError::not_owned());
        }
        let deck_id = state.resolve_target(&placement.owner, placement.target)?;
        let deck = state
            .deck_mut(&deck_id)
            .ok_or_else(DeckRepositoryError::deck_not_found)?;
        match placement.item {
            ItemRef::Hero(id) if !deck.hero_ids.contains(&id) => deck.hero_ids.push(id),
            ItemRef::Spell(id) if !deck.spell_ids.contains(&id) => deck.spell_ids.push(id),
            _ => {}
        }
        Ok(deck_id)
    }

    async fn remove_item(&self, deck: &DeckId, item: &ItemRef) -> Result<(), DeckRepositoryError> {
        let mut state = self.lock().map_err(DeckRepositoryError::query)?;
        let deck = state
            .deck_mut(deck)
            .ok_or_else(DeckRepositoryError::deck_not_found)?;
        match item {
            ItemRef::Hero(id) => deck.hero_ids.retain(|member| member != id),
            ItemRef::Spell(id) => deck.spell_ids.retain(|member| member != id),
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
