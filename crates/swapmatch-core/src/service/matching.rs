//! Reciprocal skill-trade partner discovery.

use swapmatch_types::config::MatchingConfig;
use swapmatch_types::error::MatchError;
use swapmatch_types::swap::SwapMatch;
use swapmatch_types::user::UserId;
use tracing::debug;

use crate::repository::skill_relation::SkillRelationRepository;

/// Finds users who want something the caller offers and offer something
/// the caller wants.
pub struct MatchService<K: SkillRelationRepository> {
    skills: K,
    config: MatchingConfig,
}

impl<K: SkillRelationRepository> MatchService<K> {
    pub fn new(skills: K, config: MatchingConfig) -> Self {
        Self { skills, config }
    }

    /// Potential trade partners for `user_id`.
    ///
    /// One entry per (offered skill, wanted skill, partner) triple, so a
    /// partner matching on several pairs appears several times. At most
    /// `max_results` entries; which ones survive the cap is unspecified.
    /// Every entry carries the same flat score.
    pub async fn find_potential_matches(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<SwapMatch>, MatchError> {
        let offered = self.skills.offered_skills(user_id).await?;
        let wanted = self.skills.wanted_skills(user_id).await?;
        if offered.is_empty() || wanted.is_empty() {
            debug!(user_id = %user_id, "no offered or wanted skills, skipping match search");
            return Ok(Vec::new());
        }

        let mut candidates = self
            .skills
            .find_trade_partners(user_id, self.config.max_results)
            .await?;
        candidates.truncate(self.config.max_results as usize);

        let matches: Vec<SwapMatch> = candidates
            .into_iter()
            .map(|c| SwapMatch {
                user: c.user,
                offered_skill: c.offered_skill,
                wanted_skill: c.wanted_skill,
                match_score: self.config.base_score,
            })
            .collect();

        debug!(user_id = %user_id, count = matches.len(), "potential matches found");
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeDirectory;

    #[tokio::test]
    async fn test_reciprocal_match_found() {
        let dir = FakeDirectory::default();
        let u1 = dir.add_user("U1");
        let u2 = dir.add_user("U2");
        let python = dir.add_skill("Python");
        let spanish = dir.add_skill("Spanish");
        dir.offer(u1, python);
        dir.want(u1, spanish);
        dir.offer(u2, spanish);
        dir.want(u2, python);

        let service = MatchService::new(dir, MatchingConfig::default());
        let matches = service.find_potential_matches(&u1).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].user.id, u2);
        assert_eq!(matches[0].offered_skill.name, "Python");
        assert_eq!(matches[0].wanted_skill.name, "Spanish");
        assert_eq!(matches[0].match_score, 80);
    }

    #[tokio::test]
    async fn test_partner_repeated_per_skill_pair() {
        let dir = FakeDirectory::default();
        let u1 = dir.add_user("U1");
        let u2 = dir.add_user("U2");
        let a = dir.add_skill("A");
        let b = dir.add_skill("B");
        let c = dir.add_skill("C");
        dir.offer(u1, a);
        dir.offer(u1, b);
        dir.want(u1, c);
        dir.want(u2, a);
        dir.want(u2, b);
        dir.offer(u2, c);

        let service = MatchService::new(dir, MatchingConfig::default());
        let matches = service.find_potential_matches(&u1).await.unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.user.id == u2));
    }

    #[tokio::test]
    async fn test_private_deleted_and_self_excluded() {
        let dir = FakeDirectory::default();
        let me = dir.add_user("me");
        let hidden = dir.add_private_user("hidden");
        let gone = dir.add_deleted_user("gone");
        let x = dir.add_skill("X");
        let y = dir.add_skill("Y");
        dir.offer(me, x);
        dir.want(me, y);
        // wanting what I offer and offering what I want myself
        dir.want(me, x);
        dir.offer(me, y);
        for other in [hidden, gone] {
            dir.want(other, x);
            dir.offer(other, y);
        }

        let service = MatchService::new(dir, MatchingConfig::default());
        assert!(service.find_potential_matches(&me).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_results_capped() {
        let dir = FakeDirectory::default();
        let me = dir.add_user("me");
        let x = dir.add_skill("X");
        let y = dir.add_skill("Y");
        dir.offer(me, x);
        dir.want(me, y);
        for i in 0..25 {
            let other = dir.add_user(&format!("user-{i}"));
            dir.want(other, x);
            dir.offer(other, y);
        }

        let service = MatchService::new(dir.clone(), MatchingConfig::default());
        assert_eq!(service.find_potential_matches(&me).await.unwrap().len(), 20);

        let small = MatchService::new(
            dir,
            MatchingConfig {
                max_results: 3,
                base_score: 50,
            },
        );
        let matches = small.find_potential_matches(&me).await.unwrap();
        assert_eq!(matches.len(), 3);
        assert!(matches.iter().all(|m| m.match_score == 50));
    }

    #[tokio::test]
    async fn test_no_wanted_skills_means_no_matches() {
        let dir = FakeDirectory::default();
        let me = dir.add_user("me");
        let other = dir.add_user("other");
        let x = dir.add_skill("X");
        dir.offer(me, x);
        dir.want(other, x);

        let service = MatchService::new(dir, MatchingConfig::default());
        assert!(service.find_potential_matches(&me).await.unwrap().is_empty());
    }
}
