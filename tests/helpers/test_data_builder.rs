// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use volunteer_scheduler::domain::{
    DirectAssignment, FamilyLink, PairRecord, Person, PersonCategory, PositionRequirement, Role,
    RosterRecord,
};
use volunteer_scheduler::GroupingInput;

// ==========================================
// Person 构建器
// ==========================================

pub struct PersonBuilder {
    person: Person,
}

impl PersonBuilder {
    pub fn new(id: &str, category: PersonCategory) -> Self {
        Self {
            person: Person::new(id, format!("姓名{}", id), category),
        }
    }

    pub fn normal(id: &str) -> Self {
        Self::new(id, PersonCategory::Normal)
    }

    pub fn internal(id: &str) -> Self {
        Self::new(id, PersonCategory::Internal)
    }

    pub fn family(id: &str) -> Self {
        Self::new(id, PersonCategory::Family)
    }

    pub fn group_member(id: &str) -> Self {
        Self::new(id, PersonCategory::Group)
    }

    pub fn name(mut self, name: &str) -> Self {
        self.person.name = name.to_string();
        self
    }

    pub fn leader(mut self) -> Self {
        self.person.roles.insert(Role::Leader);
        self
    }

    pub fn score(mut self, score: f64) -> Self {
        self.person.general_score = Some(score);
        self
    }

    pub fn specialist(mut self, role: Role, score: f64) -> Self {
        self.person.specialist_scores.insert(role, score);
        self
    }

    pub fn reserve(mut self) -> Self {
        self.person.reserve = true;
        self
    }

    pub fn build(self) -> Person {
        self.person
    }
}

// ==========================================
// GroupingInput 构建器
// ==========================================

#[derive(Default)]
pub struct InputBuilder {
    input: GroupingInput,
}

impl InputBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn person(mut self, person: PersonBuilder) -> Self {
        self.input.people.push(person.build());
        self
    }

    /// 批量添加普通志愿者: 前缀 + 两位序号，总分递减
    pub fn normals(mut self, prefix: &str, count: usize) -> Self {
        for i in 0..count {
            let id = format!("{}{:02}", prefix, i);
            self.input
                .people
                .push(PersonBuilder::normal(&id).score(100.0 - i as f64).build());
        }
        self
    }

    /// 批量添加组长
    pub fn leaders(mut self, count: usize) -> Self {
        for i in 0..count {
            let id = format!("L{:02}", i);
            self.input.people.push(PersonBuilder::normal(&id).leader().build());
        }
        self
    }

    pub fn requirement(mut self, name: &str, headcount: i64) -> Self {
        self.input
            .requirements
            .push(PositionRequirement::new(name, headcount));
        self
    }

    pub fn pair(mut self, first: &str, second: &str) -> Self {
        let record = PairRecord::new(first, &self.name_of(first), second, &self.name_of(second));
        self.input.pairs.push(record);
        self
    }

    pub fn family(mut self, id: &str, internal_name: &str, wants_same_group: bool) -> Self {
        let link = FamilyLink::new(id, &self.name_of(id), internal_name, wants_same_group);
        self.input.family_links.push(link);
        self
    }

    pub fn roster(mut self, name: &str, ids: &[&str]) -> Self {
        let names: Vec<String> = ids.iter().map(|id| self.name_of(id)).collect();
        let members: Vec<(&str, &str)> = ids
            .iter()
            .zip(names.iter())
            .map(|(id, name)| (*id, name.as_str()))
            .collect();
        self.input.rosters.push(RosterRecord::new(name, &members));
        self
    }

    pub fn direct(mut self, person_id: &str, group_id: u32) -> Self {
        self.input
            .direct_assignments
            .push(DirectAssignment::new(person_id, group_id));
        self
    }

    pub fn leader_headcount(mut self, count: usize) -> Self {
        self.input.leader_headcount = Some(count);
        self
    }

    pub fn build(self) -> GroupingInput {
        self.input
    }

    fn name_of(&self, id: &str) -> String {
        self.input
            .people
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("姓名{}", id))
    }
}
